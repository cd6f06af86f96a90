use crate::{
    foundation::{
        core::Rgba8Premul,
        error::{LuminaError, LuminaResult},
        math::mul_div255_u8,
    },
    render::{blur::blur_rgba8_premul, surface::FrameRGBA},
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over blend of `src` (scaled by `opacity`) onto `dst`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Replace every pixel of `frame` with `px`.
pub fn clear(frame: &mut FrameRGBA, px: Rgba8Premul) {
    let px = px.to_array();
    for d in frame.data.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

/// Blend a per-pixel paint over the whole frame; `paint` receives pixel-centre coordinates.
pub fn blend_with(frame: &mut FrameRGBA, mut paint: impl FnMut(f32, f32) -> PremulRgba8) {
    let w = frame.width as usize;
    for (i, d) in frame.data.chunks_exact_mut(4).enumerate() {
        let x = (i % w) as f32 + 0.5;
        let y = (i / w) as f32 + 0.5;
        let src = paint(x, y);
        if src[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], src, 1.0);
        d.copy_from_slice(&out);
    }
}

/// Blend a paint that only varies per row; cheaper than [`blend_with`] for vertical ramps.
pub fn blend_rows(frame: &mut FrameRGBA, mut paint: impl FnMut(f32) -> PremulRgba8) {
    let row_len = frame.width as usize * 4;
    for (y, row) in frame.data.chunks_exact_mut(row_len).enumerate() {
        let src = paint(y as f32 + 0.5);
        if src[3] == 0 {
            continue;
        }
        for d in row.chunks_exact_mut(4) {
            let out = over([d[0], d[1], d[2], d[3]], src, 1.0);
            d.copy_from_slice(&out);
        }
    }
}

/// Premultiplied bitmap positioned on the canvas. The origin may lie outside the frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    /// Left edge in frame pixels.
    pub x: i32,
    /// Top edge in frame pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 pixels.
    pub data: Vec<u8>,
}

impl Layer {
    /// Wrap a premultiplied buffer placed at `(x, y)`.
    pub fn new(x: i32, y: i32, width: u32, height: u32, data: Vec<u8>) -> LuminaResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| LuminaError::render("layer buffer size overflow"))?;
        if data.len() != expected {
            return Err(LuminaError::render(
                "layer expects data matching width*height*4",
            ));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            data,
        })
    }

    /// Tight box around pixels with non-zero alpha, as `(x0, y0, x1, y1)` exclusive.
    fn content_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let w = self.width as usize;
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (i, px) in self.data.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let (x, y) = ((i % w) as u32, (i / w) as u32);
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
        bounds
    }

    /// Crop to the visible content grown by `pad` on every side; `None` when fully transparent.
    pub fn cropped_to_content(&self, pad: u32) -> Option<Self> {
        let (x0, y0, x1, y1) = self.content_bounds()?;
        let cw = x1 - x0 + 2 * pad;
        let ch = y1 - y0 + 2 * pad;
        let mut data = vec![0u8; (cw as usize) * (ch as usize) * 4];
        let src_stride = self.width as usize * 4;
        let dst_stride = cw as usize * 4;
        let span = (x1 - x0) as usize * 4;
        for row in 0..(y1 - y0) as usize {
            let s = (y0 as usize + row) * src_stride + x0 as usize * 4;
            let d = (pad as usize + row) * dst_stride + pad as usize * 4;
            data[d..d + span].copy_from_slice(&self.data[s..s + span]);
        }
        Some(Self {
            x: self.x + x0 as i32 - pad as i32,
            y: self.y + y0 as i32 - pad as i32,
            width: cw,
            height: ch,
            data,
        })
    }

    /// Shadow silhouette: this layer's alpha tinted with `color`, blurred like a canvas
    /// `shadowBlur` of `blur_px` (Gaussian sigma = `blur_px / 2`).
    ///
    /// The layer should carry at least [`shadow_pad`] transparent pixels around its content so the
    /// blur is not clipped.
    pub fn shadow(&self, color: Rgba8Premul, blur_px: f32) -> LuminaResult<Self> {
        let tint = color.to_array();
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = u16::from(px[3]);
            data.extend(tint.iter().map(|&c| mul_div255_u8(u16::from(c), a)));
        }
        let sigma = blur_px / 2.0;
        let radius = shadow_pad(blur_px);
        let data = if radius == 0 {
            data
        } else {
            blur_rgba8_premul(&data, self.width, self.height, radius, sigma)?
        };
        Self::new(self.x, self.y, self.width, self.height, data)
    }
}

/// Padding needed around content for a shadow of `blur_px` to fade out fully.
pub fn shadow_pad(blur_px: f32) -> u32 {
    if !blur_px.is_finite() || blur_px <= 0.0 {
        return 0;
    }
    (blur_px * 1.5).ceil() as u32
}

/// Source-over `layer` onto `frame` at its position, clipped to the frame.
pub fn draw_layer(frame: &mut FrameRGBA, layer: &Layer, opacity: f32) {
    let fw = frame.width as i32;
    let fh = frame.height as i32;
    let x0 = layer.x.max(0);
    let y0 = layer.y.max(0);
    let x1 = (layer.x + layer.width as i32).min(fw);
    let y1 = (layer.y + layer.height as i32).min(fh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for y in y0..y1 {
        let ly = (y - layer.y) as usize;
        for x in x0..x1 {
            let lx = (x - layer.x) as usize;
            let si = (ly * layer.width as usize + lx) * 4;
            let src = [
                layer.data[si],
                layer.data[si + 1],
                layer.data[si + 2],
                layer.data[si + 3],
            ];
            if src[3] == 0 {
                continue;
            }
            let di = ((y as usize) * (fw as usize) + x as usize) * 4;
            let dst = [
                frame.data[di],
                frame.data[di + 1],
                frame.data[di + 2],
                frame.data[di + 3],
            ];
            frame.data[di..di + 4].copy_from_slice(&over(dst, src, opacity));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
