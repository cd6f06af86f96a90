use super::*;

#[test]
fn parse_hex_accepts_short_long_and_alpha_forms() {
    assert_eq!(Color::parse_hex("#fff"), Some(Color::WHITE));
    assert_eq!(
        Color::parse_hex("#1E293B"),
        Some(Color::rgb(0x1e, 0x29, 0x3b))
    );
    assert_eq!(
        Color::parse_hex("00000080"),
        Some(Color::rgba(0, 0, 0, 0x80))
    );
    assert_eq!(Color::parse_hex("#12345"), None);
    assert_eq!(Color::parse_hex("#gggggg"), None);
    assert_eq!(Color::parse_hex("red"), None);
}

#[test]
fn parse_hex_rejects_signs_and_non_hex_bytes() {
    assert_eq!(Color::parse_hex("#+f+f+f"), None);
    assert_eq!(Color::parse_hex("+fff"), None);
    assert_eq!(Color::parse_hex("#-1-1-1"), None);
    assert_eq!(Color::parse_hex("#ffé"), None);
    assert_eq!(Color::parse_hex("#"), None);
}

#[test]
fn hex_serde_uses_string_form() {
    let c = Color::rgba(0x63, 0x66, 0xf1, 0x80);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#6366f180\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
    assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
}

#[test]
fn background_parses_css_linear_gradient() {
    let bg = Background::parse("linear-gradient(135deg, #6366f1, #ec4899)").unwrap();
    assert_eq!(
        bg,
        Background::LinearGradient {
            angle_deg: 135.0,
            from: Color::rgb(0x63, 0x66, 0xf1),
            to: Color::rgb(0xec, 0x48, 0x99),
        }
    );

    let default_angle = Background::parse("linear-gradient(#000 10%, #333, #fff 90%)").unwrap();
    assert_eq!(
        default_angle,
        Background::LinearGradient {
            angle_deg: 180.0,
            from: Color::BLACK,
            to: Color::WHITE,
        }
    );

    assert!(Background::parse("linear-gradient(90deg, #000)").is_none());
    assert!(Background::parse("radial-gradient(#000, #fff)").is_none());
    assert_eq!(
        Background::parse(" #000 "),
        Some(Background::solid(Color::BLACK))
    );
}

#[test]
fn mix_and_opacity() {
    assert_eq!(Color::BLACK.mix(Color::WHITE, 0.5), Color::rgb(128, 128, 128));
    assert_eq!(Color::BLACK.with_opacity(0.4).a, 102);
    assert_eq!(Color::WHITE.to_premul().to_array(), [255, 255, 255, 255]);
}
