use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LuminaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(LuminaError::render("x").to_string().contains("render error:"));
    assert!(LuminaError::asset("x").to_string().contains("asset error:"));
    assert!(
        LuminaError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LuminaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
