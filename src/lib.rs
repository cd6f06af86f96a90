//! Lumina turns a short topic into a branded social-media image post.
//!
//! The crate has three cores joined by one typed boundary:
//!
//! - [`client`]: a resilient request client for the text-generation endpoint
//! - [`design`]: the normalizer that turns untrusted model output into a [`DesignDescriptor`]
//! - [`render`]: a layered CPU compositor producing a premultiplied [`FrameRGBA`]
//!
//! [`pipeline::draft_post`] strings the first two together; [`RenderSession`] re-renders as
//! rasters arrive from [`assets::RasterLoader`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Raster decoding and asynchronous loading.
pub mod assets;
/// Text-generation client.
pub mod client;
/// Design descriptors, normalization and editor state.
pub mod design;
/// Topic → draft orchestration.
pub mod pipeline;
/// Compositor and output frames.
pub mod render;

pub use crate::foundation::core::{Canvas, Rgba8Premul};
pub use crate::foundation::error::{LuminaError, LuminaResult};

pub use crate::assets::{LoaderConfig, Raster, RasterLoader};
pub use crate::client::{
    ClientConfig, Failure, FailureKind, GeneratedPost, GenerationClient, GenerationResult, Profile,
};
pub use crate::design::{DesignDescriptor, DesignEvent, DesignState, normalize, normalize_with};
pub use crate::pipeline::{PostDraft, draft_post};
pub use crate::render::{Compositor, FrameRGBA, RenderOptions, RenderSession};
