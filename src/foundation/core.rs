use crate::foundation::error::{LuminaError, LuminaResult};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Side length used by the layout constants (Instagram square post).
    pub const REFERENCE_SIZE: u32 = 1080;

    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> LuminaResult<Self> {
        if width == 0 || height == 0 {
            return Err(LuminaError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Square canvas of `size` x `size` pixels.
    pub fn square(size: u32) -> LuminaResult<Self> {
        Self::new(size, size)
    }

    /// Scale factor from the 1080 px reference layout to this canvas.
    pub fn scale(self) -> f32 {
        self.width as f32 / Self::REFERENCE_SIZE as f32
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: Self::REFERENCE_SIZE,
            height: Self::REFERENCE_SIZE,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Pixel as a `[r, g, b, a]` array for buffer writes.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
