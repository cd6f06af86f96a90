use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8Premul;

/// Straight-alpha sRGB color.
///
/// Serialized as a `#rrggbb` / `#rrggbbaa` hex string, the same notation the model and the
/// template presets use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from 8-bit channels including alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its alpha replaced by `opacity` (0..=1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: crate::foundation::math::unit_to_u8(opacity),
            ..self
        }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (case-insensitive, `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        fn hex_byte(pair: &str) -> Option<u8> {
            u8::from_str_radix(pair, 16).ok()
        }

        match s.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in s.chars().enumerate() {
                    let v = ch.to_digit(16)? as u8;
                    c[i] = v * 16 + v;
                }
                Some(Self::rgb(c[0], c[1], c[2]))
            }
            6 => Some(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Some(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => None,
        }
    }

    /// Lowercase hex notation; alpha is only emitted when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to the premultiplied pixel format used by the compositor.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// Linear interpolation between two colors in straight sRGB space.
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        fn ch(a: u8, b: u8, t: f32) -> u8 {
            crate::foundation::math::lerp(f32::from(a), f32::from(b), t)
                .round()
                .clamp(0.0, 255.0) as u8
        }
        Self {
            r: ch(self.r, other.r, t),
            g: ch(self.g, other.g, t),
            b: ch(self.b, other.b, t),
            a: ch(self.a, other.a, t),
        }
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid color \"{s}\": expected #rgb, #rrggbb or #rrggbbaa"
            ))
        })
    }
}

/// Background paint for the first compositing pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    /// Flat fill.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// CSS-style `linear-gradient(<angle>deg, from, to)`.
    LinearGradient {
        /// CSS angle in degrees (0 = towards the top, 90 = towards the right).
        angle_deg: f32,
        /// Color at the start of the gradient line.
        from: Color,
        /// Color at the end of the gradient line.
        to: Color,
    },
}

impl Background {
    /// Solid background of `color`.
    pub fn solid(color: Color) -> Self {
        Self::Solid { color }
    }

    /// Parse a hex color or a two-stop `linear-gradient(...)` expression.
    ///
    /// The angle is optional (CSS default is `180deg`, top to bottom). Extra color stops beyond
    /// the first and last are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(args) = s
            .strip_prefix("linear-gradient(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_linear_gradient(args);
        }
        Color::parse_hex(s).map(Self::solid)
    }

    /// Representative flat color (gradient start), used where a single color is needed.
    pub fn base_color(&self) -> Color {
        match *self {
            Self::Solid { color } => color,
            Self::LinearGradient { from, .. } => from,
        }
    }
}

fn parse_linear_gradient(args: &str) -> Option<Background> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let (angle_deg, stops) = match parts.first()?.strip_suffix("deg") {
        Some(angle) => (angle.trim().parse::<f32>().ok()?, &parts[1..]),
        None => (180.0, &parts[..]),
    };
    if stops.len() < 2 || !angle_deg.is_finite() {
        return None;
    }
    // Stops may carry a position ("#fff 40%"); only the color token is used.
    let stop_color = |stop: &str| Color::parse_hex(stop.split_whitespace().next()?);
    Some(Background::LinearGradient {
        angle_deg,
        from: stop_color(stops[0])?,
        to: stop_color(stops[stops.len() - 1])?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/design/color.rs"]
mod tests;
