use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    design::templates::{DesignEvent, DesignState, reduce},
    foundation::core::Canvas,
    render::{compositor::Compositor, surface::FrameRGBA},
};

/// Caller-owned editing session: design state, compositor and the latest frame.
///
/// Every applied event re-renders, so a frame rendered before a raster arrives is simply
/// superseded by the one rendered after.
#[derive(Debug)]
pub struct RenderSession {
    state: DesignState,
    compositor: Compositor,
    canvas: Canvas,
    frame: FrameRGBA,
    renders: u64,
}

impl RenderSession {
    /// Start a session and render the initial state.
    pub fn new(state: DesignState, compositor: Compositor, canvas: Canvas) -> Self {
        let frame = compositor.render(&state.descriptor, canvas);
        Self {
            state,
            compositor,
            canvas,
            frame,
            renders: 1,
        }
    }

    /// Current design state.
    pub fn state(&self) -> &DesignState {
        &self.state
    }

    /// Latest rendered frame.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Number of renders performed so far.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Apply one event and re-render.
    pub fn apply(&mut self, event: DesignEvent) -> &FrameRGBA {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
        self.frame = self.compositor.render(&self.state.descriptor, self.canvas);
        self.renders += 1;
        &self.frame
    }

    /// Apply events from `rx` as they arrive until every sender is dropped.
    ///
    /// Returns the number of events applied.
    pub async fn drain(&mut self, rx: &mut mpsc::Receiver<DesignEvent>) -> usize {
        let mut applied = 0;
        while let Some(event) = rx.recv().await {
            debug!(?event, "applying design event");
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Consume the session, returning the final state and frame.
    pub fn finish(self) -> (DesignState, FrameRGBA) {
        (self.state, self.frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
