//! Layered CPU compositor: background, overlay, branding, typography, grain.

/// Separable Gaussian blur.
pub mod blur;
/// Pixel blending and positioned layers.
pub mod composite;
/// Pass orchestration.
pub mod compositor;
/// Composition geometry and word wrap.
pub mod layout;
/// The individual compositing passes.
pub mod passes;
/// Event-driven re-rendering.
pub mod session;
/// Output frame and PNG encoding.
pub mod surface;
/// Font selection, measurement and text rasterization.
pub mod text;

pub use compositor::{Compositor, RenderOptions};
pub use passes::Pass;
pub use session::RenderSession;
pub use surface::FrameRGBA;
pub use text::{FontSpec, SvgTextEngine, TextAlign, TextMeasure};
