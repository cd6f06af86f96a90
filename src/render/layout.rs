//! Reference-space geometry per composition, scaled to the output canvas.

use crate::{
    design::descriptor::Composition,
    foundation::core::Canvas,
    render::text::{FontSpec, PlacedLine, TextAlign, TextMeasure},
};

/// Distance between headline baselines at the reference size.
pub const LINE_HEIGHT: f32 = 70.0;
/// Logo width at the reference size.
pub const LOGO_WIDTH: f32 = 140.0;
/// Logo distance from the canvas edge at the reference size.
pub const LOGO_MARGIN: f32 = 80.0;
/// Watermark distance from the bottom edge at the reference size.
pub const WATERMARK_BOTTOM: f32 = 50.0;

/// Where and how the headline block is placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextAnchor {
    /// Anchor x in frame pixels.
    pub x: f32,
    /// Vertical centre of the whole block in frame pixels.
    pub y: f32,
    /// Horizontal alignment around `x`.
    pub align: TextAlign,
    /// Wrap width in frame pixels.
    pub max_width: f32,
}

/// Headline anchor for `composition` on `canvas`.
pub fn text_anchor(composition: Composition, canvas: Canvas) -> TextAnchor {
    let s = canvas.scale();
    let (w, h) = (canvas.width as f32, canvas.height as f32);
    match composition {
        Composition::Centered => TextAnchor {
            x: w / 2.0,
            y: h / 2.0,
            align: TextAlign::Center,
            max_width: 900.0 * s,
        },
        Composition::HeroBottom => TextAnchor {
            x: w / 2.0,
            y: h * 0.75,
            align: TextAlign::Center,
            max_width: 900.0 * s,
        },
        Composition::MinimalTop => TextAnchor {
            x: w / 2.0,
            y: h * 0.3,
            align: TextAlign::Center,
            max_width: 900.0 * s,
        },
        Composition::MagazineLayout => TextAnchor {
            x: 100.0 * s,
            y: h * 0.7,
            align: TextAlign::Left,
            max_width: 800.0 * s,
        },
    }
}

/// Top-left corner of a logo `logo_width` pixels wide.
pub fn logo_origin(composition: Composition, canvas: Canvas, logo_width: f32) -> (f32, f32) {
    let s = canvas.scale();
    let (w, h) = (canvas.width as f32, canvas.height as f32);
    let top = LOGO_MARGIN * s;
    match composition {
        Composition::Centered | Composition::HeroBottom => ((w - logo_width) / 2.0, top),
        Composition::MinimalTop => ((w - logo_width) / 2.0, h - 180.0 * s),
        Composition::MagazineLayout => (w - logo_width - LOGO_MARGIN * s, top),
    }
}

/// Greedy word wrap: words are packed while the measured line fits `max_width`.
///
/// Words are never split, so a word wider than the limit occupies a line by itself.
pub fn wrap_words(
    text: &str,
    max_width: f32,
    font: &FontSpec,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure.measure(&candidate, font) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_owned()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lay out `lines` centred vertically on the anchor: `start_y = y - (n - 1) * line_height / 2`.
pub fn place_lines(lines: Vec<String>, anchor: &TextAnchor, line_height: f32) -> Vec<PlacedLine> {
    let n = lines.len();
    let start_y = anchor.y - (n.saturating_sub(1) as f32) * line_height / 2.0;
    lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| PlacedLine {
            text,
            x: anchor.x,
            y: start_y + i as f32 * line_height,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
