//! Design descriptors: the typed boundary between model output and the compositor.

/// Colors and background paints.
pub mod color;
/// The fully-resolved descriptor and its enums.
pub mod descriptor;
/// Raw model design → descriptor.
pub mod normalize;
/// Presets and the pure design-state reducer.
pub mod templates;

pub use color::{Background, Color};
pub use descriptor::{
    Composition, DesignDescriptor, FontMood, ImageFilter, OverlayStyle, RasterSlot, RasterSource,
};
pub use normalize::{NormalizeContext, normalize, normalize_with};
pub use templates::{DesignEvent, DesignState, RasterTarget, Template, reduce};
