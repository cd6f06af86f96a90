use rand::Rng;
use tracing::warn;

use crate::{
    assets::raster::Raster,
    design::{
        color::{Background, Color},
        descriptor::{DesignDescriptor, ImageFilter, OverlayStyle},
    },
    foundation::{core::Canvas, error::LuminaResult, math::unit_to_u8},
    render::{
        composite::{Layer, blend_rows, blend_with, clear, draw_layer, shadow_pad},
        layout::{self, LINE_HEIGHT, LOGO_WIDTH, WATERMARK_BOTTOM},
        surface::FrameRGBA,
        text::{FontSpec, PlacedLine, SvgTextEngine, TextAlign, TextMeasure},
    },
};

/// Compositing stages, executed in [`Pass::ORDER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Photo (cover-scaled, graded) or solid/gradient fill.
    Background,
    /// Legibility overlay.
    Overlay,
    /// Logo or text watermark.
    Branding,
    /// Wrapped headline with drop shadow.
    Typography,
    /// Film-grain finish.
    Grain,
}

impl Pass {
    /// Execution order; later passes draw over earlier ones.
    pub const ORDER: [Self; 5] = [
        Self::Background,
        Self::Overlay,
        Self::Branding,
        Self::Typography,
        Self::Grain,
    ];

    /// Lowercase name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Overlay => "overlay",
            Self::Branding => "branding",
            Self::Typography => "typography",
            Self::Grain => "grain",
        }
    }
}

/// Inputs shared by every pass of one render.
pub(crate) struct PassContext<'a, R> {
    pub(crate) descriptor: &'a DesignDescriptor,
    pub(crate) canvas: Canvas,
    pub(crate) text: &'a SvgTextEngine,
    pub(crate) grain_amplitude: u8,
    pub(crate) rng: R,
}

pub(crate) fn execute<R: Rng>(
    pass: Pass,
    frame: &mut FrameRGBA,
    ctx: &mut PassContext<'_, R>,
) -> LuminaResult<()> {
    let d = ctx.descriptor;
    match pass {
        Pass::Background => {
            paint_background(frame, d);
            Ok(())
        }
        Pass::Overlay => {
            paint_overlay(frame, d.overlay_style);
            Ok(())
        }
        Pass::Branding => match d.logo.ready() {
            Some(logo) => draw_logo(frame, logo, d, ctx.canvas),
            None => draw_watermark(frame, &d.watermark, ctx.canvas, ctx.text),
        },
        Pass::Typography => draw_headline(frame, d, ctx.canvas, ctx.text),
        Pass::Grain => {
            apply_grain(frame, ctx.grain_amplitude, &mut ctx.rng);
            Ok(())
        }
    }
}

/// Background pass. A photo that cannot be drawn falls back to the paint.
pub fn paint_background(frame: &mut FrameRGBA, d: &DesignDescriptor) {
    if let Some(photo) = d.background_image.ready() {
        clear(frame, d.background.base_color().to_premul());
        match draw_cover(frame, photo) {
            Ok(()) => {
                apply_image_filter(frame, d.image_filter);
                return;
            }
            Err(e) => warn!(error = %e, "background photo skipped"),
        }
    }
    fill_background(frame, &d.background);
}

/// Fill with a solid color or a CSS-style linear gradient.
pub fn fill_background(frame: &mut FrameRGBA, background: &Background) {
    match *background {
        Background::Solid { color } => clear(frame, color.to_premul()),
        Background::LinearGradient {
            angle_deg,
            from,
            to,
        } => {
            clear(frame, crate::foundation::core::Rgba8Premul::transparent());
            let (w, h) = (frame.width as f32, frame.height as f32);
            // CSS: 0deg points up, angles run clockwise; the line spans the box corners.
            let theta = angle_deg.to_radians();
            let (dx, dy) = (theta.sin(), -theta.cos());
            let len = (w * dx).abs() + (h * dy).abs();
            let (cx, cy) = (w / 2.0, h / 2.0);
            blend_with(frame, |x, y| {
                let t = if len > 0.0 {
                    ((x - cx) * dx + (y - cy) * dy) / len + 0.5
                } else {
                    0.0
                };
                from.mix(to, t).to_premul().to_array()
            });
        }
    }
}

/// Scale `photo` to cover the frame (aspect preserved, centred crop) and draw it.
///
/// Only the visible window of the source is resampled, so the work is bounded by the frame size
/// whatever the photo's aspect ratio.
pub fn draw_cover(frame: &mut FrameRGBA, photo: &Raster) -> LuminaResult<()> {
    let (fw, fh) = (frame.width as f32, frame.height as f32);
    let (pw, ph) = (photo.width as f32, photo.height as f32);
    let (vw, vh) = if photo.aspect() > fw / fh {
        (ph * fw / fh, ph)
    } else {
        (pw, pw * fh / fw)
    };
    let vw = vw.round().clamp(1.0, pw);
    let vh = vh.round().clamp(1.0, ph);
    let x0 = ((pw - vw) / 2.0).round() as u32;
    let y0 = ((ph - vh) / 2.0).round() as u32;

    let window = photo.cropped(x0, y0, vw as u32, vh as u32)?;
    let scaled = window.resized(frame.width, frame.height)?;
    let layer = Layer::new(0, 0, scaled.width, scaled.height, scaled.rgba8_premul.to_vec())?;
    draw_layer(frame, &layer, 1.0);
    Ok(())
}

/// Color grade applied in place to premultiplied pixels.
pub fn apply_image_filter(frame: &mut FrameRGBA, filter: ImageFilter) {
    let matrix: [[f32; 3]; 3] = match filter {
        ImageFilter::None => return,
        ImageFilter::Sepia => [
            [0.393, 0.769, 0.189],
            [0.349, 0.686, 0.168],
            [0.272, 0.534, 0.131],
        ],
        ImageFilter::Warm => [[1.08, 0.0, 0.0], [0.0, 1.02, 0.0], [0.0, 0.0, 0.88]],
        ImageFilter::Cool => [[0.9, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.1]],
        ImageFilter::Muted => saturation_matrix(0.6),
    };
    for px in frame.data.chunks_exact_mut(4) {
        let a = f32::from(px[3]);
        let src = [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])];
        for (c, row) in px[..3].iter_mut().zip(&matrix) {
            let v = row[0] * src[0] + row[1] * src[1] + row[2] * src[2];
            *c = v.round().clamp(0.0, a) as u8;
        }
    }
}

fn saturation_matrix(s: f32) -> [[f32; 3]; 3] {
    const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];
    let mut m = [[0.0; 3]; 3];
    for (i, row) in m.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            let identity = if i == j { 1.0 } else { 0.0 };
            *v = LUMA[j] * (1.0 - s) + identity * s;
        }
    }
    m
}

/// Overlay pass.
pub fn paint_overlay(frame: &mut FrameRGBA, style: OverlayStyle) {
    let black = |opacity: f32| [0, 0, 0, unit_to_u8(opacity)];
    let (w, h) = (frame.width as f32, frame.height as f32);
    match style {
        OverlayStyle::None => {}
        OverlayStyle::GradientBottom => {
            let (start, end) = (h * 0.4, h * 0.88);
            blend_rows(frame, |y| {
                let t = ((y - start) / (end - start)).clamp(0.0, 1.0);
                black(0.85 * t)
            });
        }
        OverlayStyle::Vignette => {
            let (cx, cy) = (w / 2.0, h / 2.0);
            let (r0, r1) = (w * 0.3, w * 0.8);
            blend_with(frame, |x, y| {
                let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                let t = ((r - r0) / (r1 - r0)).clamp(0.0, 1.0);
                black(0.7 * t)
            });
        }
        OverlayStyle::SolidDim => blend_rows(frame, |_| black(0.4)),
        OverlayStyle::Glass => {
            let tint = Color::WHITE.with_opacity(0.10).to_premul().to_array();
            blend_rows(frame, |_| tint);
        }
    }
}

fn draw_with_shadow(
    frame: &mut FrameRGBA,
    layer: &Layer,
    shadow_color: Color,
    blur_px: f32,
    opacity: f32,
) -> LuminaResult<()> {
    let Some(padded) = layer.cropped_to_content(shadow_pad(blur_px)) else {
        return Ok(());
    };
    let shadow = padded.shadow(shadow_color.to_premul(), blur_px)?;
    draw_layer(frame, &shadow, opacity);
    draw_layer(frame, &padded, opacity);
    Ok(())
}

/// Logo at 140 reference px wide, 0.9 opacity, soft shadow.
pub fn draw_logo(
    frame: &mut FrameRGBA,
    logo: &Raster,
    d: &DesignDescriptor,
    canvas: Canvas,
) -> LuminaResult<()> {
    let s = canvas.scale();
    let lw = (LOGO_WIDTH * s).round().max(1.0);
    let lh = (lw / logo.aspect()).round().clamp(1.0, canvas.height as f32);
    let scaled = logo.resized(lw as u32, lh as u32)?;
    let (x, y) = layout::logo_origin(d.composition, canvas, lw);
    let layer = Layer::new(
        x.round() as i32,
        y.round() as i32,
        scaled.width,
        scaled.height,
        scaled.rgba8_premul.to_vec(),
    )?;
    draw_with_shadow(frame, &layer, Color::BLACK.with_opacity(0.3), 10.0 * s, 0.9)
}

/// `@handle` text centred near the bottom edge.
pub fn draw_watermark(
    frame: &mut FrameRGBA,
    handle: &str,
    canvas: Canvas,
    text: &SvgTextEngine,
) -> LuminaResult<()> {
    if handle.trim().is_empty() {
        return Ok(());
    }
    let s = canvas.scale();
    let font = FontSpec::watermark().scaled(s);
    // Drawn on the alphabetic baseline; the engine centres lines, so lift by ~0.35em.
    let line = PlacedLine {
        text: handle.to_owned(),
        x: canvas.width as f32 / 2.0,
        y: canvas.height as f32 - WATERMARK_BOTTOM * s - font.size_px * 0.35,
    };
    let layer = text.rasterize(
        canvas,
        &[line],
        &font,
        TextAlign::Center,
        Color::WHITE.with_opacity(0.7),
    )?;
    draw_with_shadow(frame, &layer, Color::BLACK.with_opacity(0.5), 5.0 * s, 1.0)
}

/// Wrapped headline with a heavy drop shadow.
pub fn draw_headline(
    frame: &mut FrameRGBA,
    d: &DesignDescriptor,
    canvas: Canvas,
    text: &SvgTextEngine,
) -> LuminaResult<()> {
    if !text.has_fonts() {
        warn!("no fonts installed; headline not drawn");
        return Ok(());
    }
    let s = canvas.scale();
    let font = FontSpec::for_mood(d.font_mood).scaled(s);
    let anchor = layout::text_anchor(d.composition, canvas);
    let lines = layout::wrap_words(&d.headline, anchor.max_width, &font, text as &dyn TextMeasure);
    let placed = layout::place_lines(lines, &anchor, LINE_HEIGHT * s);
    let layer = text.rasterize(canvas, &placed, &font, anchor.align, d.text_color)?;
    draw_with_shadow(frame, &layer, Color::BLACK.with_opacity(0.8), 20.0 * s, 1.0)
}

/// Add the same uniform noise in `[-amplitude, amplitude]` to R, G and B of every pixel.
///
/// Channels stay within `0..=alpha` so the buffer remains valid premultiplied data.
pub fn apply_grain(frame: &mut FrameRGBA, amplitude: u8, rng: &mut impl Rng) {
    if amplitude == 0 {
        return;
    }
    let amp = i16::from(amplitude);
    for px in frame.data.chunks_exact_mut(4) {
        let noise = rng.gen_range(-amp..=amp);
        let alpha = i16::from(px[3]);
        for c in &mut px[..3] {
            *c = (i16::from(*c) + noise).clamp(0, alpha) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
