use std::path::PathBuf;

use super::*;

fn engine() -> SvgTextEngine {
    SvgTextEngine::new::<PathBuf>(&[])
}

#[test]
fn moods_map_to_faces() {
    let bold = FontSpec::for_mood(FontMood::Bold);
    assert_eq!((bold.family, bold.weight, bold.size_px), ("Oswald", 700, 55.0));
    let classic = FontSpec::for_mood(FontMood::Classic);
    assert_eq!(classic.generic, "serif");
    let hand = FontSpec::for_mood(FontMood::Handwritten);
    assert_eq!(hand.generic, "cursive");
}

#[test]
fn scaled_only_changes_size() {
    let f = FontSpec::watermark().scaled(0.5);
    assert_eq!(f.size_px, 14.0);
    assert_eq!(f.weight, 700);
}

#[test]
fn xml_escape_neutralizes_markup() {
    assert_eq!(
        xml_escape("<b>Tom & \"Jerry's\"</b>"),
        "&lt;b&gt;Tom &amp; &quot;Jerry&apos;s&quot;&lt;/b&gt;"
    );
    assert_eq!(xml_escape("a\nb"), "a b");
}

#[test]
fn text_element_carries_font_and_fill() {
    let mut out = String::new();
    let line = PlacedLine {
        text: "Hi".to_owned(),
        x: 10.0,
        y: 20.0,
    };
    push_text_element(
        &mut out,
        &line,
        &FontSpec::for_mood(FontMood::Modern),
        TextAlign::Center,
        Color::WHITE.with_opacity(0.5),
    );
    assert!(out.contains(r#"font-family="'Plus Jakarta Sans', sans-serif""#));
    assert!(out.contains(r##"fill="#ffffff""##));
    assert!(out.contains(r#"text-anchor="middle""#));
    assert!(out.contains(">Hi</text>"));
}

#[test]
fn missing_font_dir_is_tolerated() {
    let e = SvgTextEngine::new(&[PathBuf::from("/definitely/not/a/font/dir")]);
    let _ = e.has_fonts();
}

#[test]
fn blank_text_measures_zero() {
    let e = engine();
    assert_eq!(e.measure("   ", &FontSpec::watermark()), 0.0);
}

#[test]
fn longer_text_measures_wider_when_fonts_exist() {
    let e = engine();
    if !e.has_fonts() {
        return;
    }
    let font = FontSpec::for_mood(FontMood::Modern);
    let short = e.measure("Sale", &font);
    let long = e.measure("Sale Sale Sale", &font);
    assert!(short > 0.0);
    assert!(long > short);
}

#[test]
fn rasterize_returns_canvas_sized_layer() {
    let e = engine();
    let canvas = Canvas::square(64).unwrap();
    let line = PlacedLine {
        text: "A".to_owned(),
        x: 32.0,
        y: 32.0,
    };
    let layer = e
        .rasterize(
            canvas,
            &[line],
            &FontSpec::for_mood(FontMood::Bold).scaled(0.5),
            TextAlign::Center,
            Color::WHITE,
        )
        .unwrap();
    assert_eq!((layer.x, layer.y, layer.width, layer.height), (0, 0, 64, 64));
    if e.has_fonts() {
        assert!(layer.data.chunks_exact(4).any(|px| px[3] > 0));
    }
}
