use std::path::PathBuf;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    design::descriptor::DesignDescriptor,
    foundation::core::Canvas,
    render::{
        passes::{Pass, PassContext, execute},
        surface::FrameRGBA,
        text::SvgTextEngine,
    },
};

/// Render-time knobs that are not part of the design.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Max absolute per-channel grain noise; 0 disables the finish pass.
    pub grain_amplitude: u8,
    /// Seed for the grain noise. `None` draws a fresh seed per render.
    pub grain_seed: Option<u64>,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` faces.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            grain_amplitude: 10,
            grain_seed: None,
            font_dirs: Vec::new(),
        }
    }
}

/// Turns a [`DesignDescriptor`] into pixels.
///
/// Building one loads the font database, so keep it around between renders.
#[derive(Debug)]
pub struct Compositor {
    text: SvgTextEngine,
    options: RenderOptions,
}

impl Compositor {
    /// Compositor with its own text engine.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            text: SvgTextEngine::new(&options.font_dirs),
            options,
        }
    }

    /// Active options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Text engine used for measuring and drawing.
    pub fn text_engine(&self) -> &SvgTextEngine {
        &self.text
    }

    /// Run every pass in order. A failing pass is logged and skipped; rendering itself never
    /// fails.
    #[tracing::instrument(
        skip(self, descriptor),
        fields(composition = %descriptor.composition, overlay = %descriptor.overlay_style)
    )]
    pub fn render(&self, descriptor: &DesignDescriptor, canvas: Canvas) -> FrameRGBA {
        let rng = match self.options.grain_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut ctx = PassContext {
            descriptor,
            canvas,
            text: &self.text,
            grain_amplitude: self.options.grain_amplitude,
            rng,
        };

        let mut frame = FrameRGBA::transparent(canvas);
        for pass in Pass::ORDER {
            if let Err(e) = execute(pass, &mut frame, &mut ctx) {
                warn!(pass = pass.name(), error = %e, "pass degraded");
            }
        }
        frame
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
