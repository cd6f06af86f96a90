use serde::{Deserialize, Serialize};

use crate::{
    assets::raster::Raster,
    design::color::{Background, Color},
};

/// Generate `from_raw` / `as_str` for a closed string-valued design enum.
///
/// Matching is exact and case-sensitive: the normalizer is the only caller that sees model
/// output, and anything outside the known set falls back to the enum's default.
macro_rules! design_enum {
    ($name:ident { $($variant:ident => $raw:literal),+ $(,)? }) => {
        impl $name {
            /// Every known variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Match a raw model string against the known values.
            pub fn from_raw(raw: &str) -> Option<Self> {
                match raw {
                    $($raw => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Canonical wire string for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $raw,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Tonal layer blended over the background to keep text legible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayStyle {
    /// No overlay.
    None,
    /// Transparent at 40% height ramping to dark at the bottom.
    #[default]
    GradientBottom,
    /// Radial darkening towards the edges.
    Vignette,
    /// Flat 40% black.
    SolidDim,
    /// Flat translucent white tint.
    Glass,
}

design_enum!(OverlayStyle {
    None => "none",
    GradientBottom => "gradient-bottom",
    Vignette => "vignette",
    SolidDim => "solid-dim",
    Glass => "glass",
});

/// Layout preset controlling headline anchor, alignment and logo placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Composition {
    /// Headline centred on the canvas, logo top-centre.
    #[default]
    Centered,
    /// Headline in the lower quarter, logo top-centre.
    HeroBottom,
    /// Headline in the upper third, logo bottom-centre.
    MinimalTop,
    /// Left-aligned headline low on the canvas, logo top-right.
    MagazineLayout,
}

design_enum!(Composition {
    Centered => "centered",
    HeroBottom => "hero-bottom",
    MinimalTop => "minimal-top",
    MagazineLayout => "magazine-layout",
});

impl Composition {
    /// Map the older `layout` vocabulary (`center`, `hero`, `clean`, `bold`).
    pub fn from_legacy_layout(raw: &str) -> Option<Self> {
        match raw {
            "center" => Some(Self::Centered),
            "hero" => Some(Self::HeroBottom),
            "clean" => Some(Self::MinimalTop),
            "bold" => Some(Self::MagazineLayout),
            _ => None,
        }
    }
}

/// Typeface family selection for the headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontMood {
    /// Geometric sans.
    #[default]
    Modern,
    /// Serif display face.
    Classic,
    /// Script face.
    Handwritten,
    /// Condensed heavy sans.
    Bold,
}

design_enum!(FontMood {
    Modern => "modern",
    Classic => "classic",
    Handwritten => "handwritten",
    Bold => "bold",
});

/// Color grade applied to a loaded background photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFilter {
    /// Leave the photo untouched.
    #[default]
    None,
    /// Brown monochrome tone.
    Sepia,
    /// Push towards red/yellow.
    Warm,
    /// Push towards blue.
    Cool,
    /// Partial desaturation.
    Muted,
}

design_enum!(ImageFilter {
    None => "none",
    Sepia => "sepia",
    Warm => "warm",
    Cool => "cool",
    Muted => "muted",
});

/// Where a raster comes from before it is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RasterSource {
    /// Text prompt for the image-generation endpoint.
    Prompt(String),
    /// Direct image URL.
    Url(String),
    /// `data:` URL carrying the encoded image inline.
    DataUrl(String),
}

/// Lifecycle of an optional raster field.
///
/// Only [`RasterSlot::Ready`] affects rendering; every other state renders as if the raster were
/// absent, so a failed or in-flight load never blocks a frame.
#[derive(Debug, Clone, Default)]
pub enum RasterSlot {
    /// Nothing to load.
    #[default]
    Absent,
    /// A load has been requested but has not completed.
    Pending(RasterSource),
    /// Decoded raster ready for drawing.
    Ready(Raster),
    /// Load or decode failed.
    Failed(String),
}

impl RasterSlot {
    /// Decoded raster, if loaded.
    pub fn ready(&self) -> Option<&Raster> {
        match self {
            Self::Ready(r) => Some(r),
            _ => None,
        }
    }

    /// Source waiting to be loaded, if any.
    pub fn pending(&self) -> Option<&RasterSource> {
        match self {
            Self::Pending(src) => Some(src),
            _ => None,
        }
    }

    fn state_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Pending(_) => "pending",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

impl Serialize for RasterSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.state_name())
    }
}

/// Fully-resolved rendering configuration consumed by the compositor.
///
/// Built by [`crate::design::normalize`]; every enum field always holds a known variant.
#[derive(Debug, Clone, Serialize)]
pub struct DesignDescriptor {
    /// Background paint used when no photo is loaded.
    pub background: Background,
    /// Optional background photo.
    pub background_image: RasterSlot,
    /// Grade applied to the background photo.
    pub image_filter: ImageFilter,
    /// Headline color.
    pub text_color: Color,
    /// Emphasis color.
    pub accent_color: Color,
    /// Legibility overlay.
    pub overlay_style: OverlayStyle,
    /// Layout preset.
    pub composition: Composition,
    /// Headline typeface.
    pub font_mood: FontMood,
    /// Headline text, trimmed and non-empty.
    pub headline: String,
    /// Brand handle drawn when no logo is loaded.
    pub watermark: String,
    /// Optional brand logo.
    pub logo: RasterSlot,
}

impl DesignDescriptor {
    /// Dark neutral background used when the model gives none.
    pub const DEFAULT_BACKGROUND: Color = Color::rgb(0x1e, 0x29, 0x3b);
    /// Readable text color on [`Self::DEFAULT_BACKGROUND`].
    pub const DEFAULT_TEXT: Color = Color::WHITE;
    /// Default emphasis color (indigo).
    pub const DEFAULT_ACCENT: Color = Color::rgb(0x63, 0x66, 0xf1);
    /// Watermark used when the brand has no name.
    pub const DEFAULT_WATERMARK: &'static str = "@lumina.ai";
    /// Headline used when neither headline nor topic carry text.
    pub const FALLBACK_HEADLINE: &'static str = "Fresh Update";

    /// Descriptor with every documented default and the given headline.
    pub fn with_headline(headline: impl Into<String>) -> Self {
        Self {
            background: Background::solid(Self::DEFAULT_BACKGROUND),
            background_image: RasterSlot::Absent,
            image_filter: ImageFilter::default(),
            text_color: Self::DEFAULT_TEXT,
            accent_color: Self::DEFAULT_ACCENT,
            overlay_style: OverlayStyle::default(),
            composition: Composition::default(),
            font_mood: FontMood::default(),
            headline: headline.into(),
            watermark: Self::DEFAULT_WATERMARK.to_owned(),
            logo: RasterSlot::Absent,
        }
    }
}

impl Default for DesignDescriptor {
    fn default() -> Self {
        Self::with_headline(Self::FALLBACK_HEADLINE)
    }
}
