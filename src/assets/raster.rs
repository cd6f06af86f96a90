use std::sync::Arc;

use crate::foundation::error::{LuminaError, LuminaResult};

/// Decoded bitmap in premultiplied RGBA8, shared cheaply between design states.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed premultiplied RGBA8 pixels, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Raster {
    /// Wrap an existing premultiplied buffer, checking its length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> LuminaResult<Self> {
        if width == 0 || height == 0 {
            return Err(LuminaError::asset("raster dimensions must be > 0"));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8_premul.len() != expected {
            return Err(LuminaError::asset(format!(
                "raster buffer is {} bytes, expected {expected}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Resample to `width` x `height` with a triangle filter.
    ///
    /// Filtering premultiplied samples keeps edges free of dark fringes.
    pub fn resized(&self, width: u32, height: u32) -> LuminaResult<Self> {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul.to_vec())
            .ok_or_else(|| LuminaError::asset("raster buffer does not match its dimensions"))?;
        let out =
            image::imageops::resize(&src, width, height, image::imageops::FilterType::Triangle);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(out.into_raw()),
        })
    }

    /// Copy of the `width` x `height` window at `(x, y)`, clamped to the raster bounds.
    pub fn cropped(&self, x: u32, y: u32, width: u32, height: u32) -> LuminaResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(LuminaError::asset("cannot crop an empty raster"));
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let width = width.clamp(1, self.width - x);
        let height = height.clamp(1, self.height - y);
        if (x, y, width, height) == (0, 0, self.width, self.height) {
            return Ok(self.clone());
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul.to_vec())
            .ok_or_else(|| LuminaError::asset("raster buffer does not match its dimensions"))?;
        let out = image::imageops::crop_imm(&src, x, y, width, height).to_image();
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(out.into_raw()),
        })
    }

    /// Aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8_premul.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
