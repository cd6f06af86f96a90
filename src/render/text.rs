use std::{fmt::Write as _, path::Path, sync::Arc};

use crate::{
    design::{color::Color, descriptor::FontMood},
    foundation::{
        core::Canvas,
        error::{LuminaError, LuminaResult},
    },
    render::composite::Layer,
};

/// Font selection for one run of text, in reference (1080 px) units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Preferred family name.
    pub family: &'static str,
    /// CSS generic family used when `family` is not installed.
    pub generic: &'static str,
    /// CSS weight (100..=900).
    pub weight: u16,
    /// Font size in pixels at the reference canvas size.
    pub size_px: f32,
}

impl FontSpec {
    /// Headline font for a mood.
    pub fn for_mood(mood: FontMood) -> Self {
        match mood {
            FontMood::Modern => Self {
                family: "Plus Jakarta Sans",
                generic: "sans-serif",
                weight: 600,
                size_px: 48.0,
            },
            FontMood::Classic => Self {
                family: "Playfair Display",
                generic: "serif",
                weight: 700,
                size_px: 48.0,
            },
            FontMood::Handwritten => Self {
                family: "Caveat",
                generic: "cursive",
                weight: 400,
                size_px: 55.0,
            },
            FontMood::Bold => Self {
                family: "Oswald",
                generic: "sans-serif",
                weight: 700,
                size_px: 55.0,
            },
        }
    }

    /// Bold 28 px face used for the brand watermark.
    pub fn watermark() -> Self {
        Self {
            family: "Plus Jakarta Sans",
            generic: "sans-serif",
            weight: 700,
            size_px: 28.0,
        }
    }

    /// Same face with the size multiplied by `scale`.
    pub fn scaled(self, scale: f32) -> Self {
        Self {
            size_px: self.size_px * scale,
            ..self
        }
    }
}

/// Horizontal alignment of a text line relative to its anchor x.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the line centre.
    Center,
    /// Anchor is the line start.
    Left,
}

impl TextAlign {
    fn svg_anchor(self) -> &'static str {
        match self {
            Self::Center => "middle",
            Self::Left => "start",
        }
    }
}

/// Advance width of a text run; the seam that lets wrapping run without real fonts.
pub trait TextMeasure {
    /// Width in pixels of `text` set in `font`.
    fn measure(&self, text: &str, font: &FontSpec) -> f32;
}

/// One line of text positioned by its anchor point (vertically centred on `y`).
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    /// Line content.
    pub text: String,
    /// Anchor x in frame pixels.
    pub x: f32,
    /// Vertical centre in frame pixels.
    pub y: f32,
}

/// Text shaping and rasterization through `usvg`/`resvg`.
pub struct SvgTextEngine {
    options: usvg::Options<'static>,
}

impl std::fmt::Debug for SvgTextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgTextEngine")
            .field("faces", &self.options.fontdb.len())
            .finish()
    }
}

impl SvgTextEngine {
    /// Engine over system fonts plus every `.ttf`/`.otf`/`.ttc` in `font_dirs`.
    pub fn new<P: AsRef<Path>>(font_dirs: &[P]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir.as_ref());
        }
        tracing::debug!(faces = db.len(), "font database ready");

        Self {
            options: usvg::Options {
                fontdb: Arc::new(db),
                font_resolver: make_font_resolver(),
                ..Default::default()
            },
        }
    }

    /// Whether any face is available; without one every text run renders empty.
    pub fn has_fonts(&self) -> bool {
        !self.options.fontdb.is_empty()
    }

    /// Rasterize `lines` onto a transparent canvas-sized layer.
    pub fn rasterize(
        &self,
        canvas: Canvas,
        lines: &[PlacedLine],
        font: &FontSpec,
        align: TextAlign,
        fill: Color,
    ) -> LuminaResult<Layer> {
        let mut body = String::new();
        for line in lines {
            push_text_element(&mut body, line, font, align, fill);
        }
        let svg = svg_document(canvas.width as f32, canvas.height as f32, &body);
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| LuminaError::render(format!("parse text svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| LuminaError::render("failed to allocate text pixmap"))?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        Layer::new(0, 0, canvas.width, canvas.height, pixmap.take())
    }
}

impl TextMeasure for SvgTextEngine {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let line = PlacedLine {
            text: text.to_owned(),
            x: 0.0,
            y: font.size_px,
        };
        let mut body = String::new();
        push_text_element(&mut body, &line, font, TextAlign::Left, Color::BLACK);
        // Generous viewport so nothing is clipped; only the glyph bbox is read.
        let width = font.size_px * (text.chars().count() as f32 + 1.0);
        let svg = svg_document(width, font.size_px * 2.0, &body);
        match usvg::Tree::from_str(&svg, &self.options) {
            Ok(tree) => tree.root().bounding_box().width(),
            Err(e) => {
                tracing::warn!(error = %e, "measure text");
                0.0
            }
        }
    }
}

fn svg_document(width: f32, height: f32, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{body}</svg>"#
    )
}

fn push_text_element(
    out: &mut String,
    line: &PlacedLine,
    font: &FontSpec,
    align: TextAlign,
    fill: Color,
) {
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-family="'{family}', {generic}" font-weight="{weight}" font-size="{size}" fill="{fill}" fill-opacity="{opacity}" text-anchor="{anchor}" dominant-baseline="central" xml:space="preserve">{text}</text>"#,
        x = line.x,
        y = line.y,
        family = font.family,
        generic = font.generic,
        weight = font.weight,
        size = font.size_px,
        fill = Color { a: 255, ..fill }.to_hex(),
        opacity = f32::from(fill.a) / 255.0,
        anchor = align.svg_anchor(),
        text = xml_escape(&line.text),
    );
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skip font file");
        }
    }
}

fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            // Any installed face beats rendering nothing.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
