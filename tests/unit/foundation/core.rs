use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::square(0).is_err());
    assert_eq!(Canvas::square(64).unwrap().rgba_len(), 64 * 64 * 4);
}

#[test]
fn canvas_scale_is_relative_to_reference() {
    assert_eq!(Canvas::default().scale(), 1.0);
    assert_eq!(Canvas::square(540).unwrap().scale(), 0.5);
}

#[test]
fn premultiply_rounds_like_integer_blend() {
    let px = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(px.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
