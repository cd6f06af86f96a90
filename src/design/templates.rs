use crate::{
    assets::raster::Raster,
    design::{
        color::{Background, Color},
        descriptor::{Composition, DesignDescriptor, FontMood, RasterSlot},
    },
};

/// Named style preset that can be applied over a descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Template {
    /// Stable identifier.
    pub id: &'static str,
    /// Background paint.
    pub background: Background,
    /// Headline color.
    pub text_color: Color,
    /// Emphasis color.
    pub accent_color: Color,
    /// Headline typeface.
    pub font_mood: FontMood,
    /// Layout preset.
    pub composition: Composition,
}

impl Template {
    /// Overwrite the palette, typeface and layout of `descriptor`.
    ///
    /// Text, overlay and rasters are kept.
    pub fn apply_to(&self, descriptor: &mut DesignDescriptor) {
        descriptor.background = self.background;
        descriptor.text_color = self.text_color;
        descriptor.accent_color = self.accent_color;
        descriptor.font_mood = self.font_mood;
        descriptor.composition = self.composition;
    }
}

/// Built-in presets, cycled by [`DesignEvent::NextTemplate`].
pub const TEMPLATES: [Template; 4] = [
    Template {
        id: "modern_bold",
        background: Background::Solid {
            color: Color::rgb(0x1e, 0x29, 0x3b),
        },
        text_color: Color::WHITE,
        accent_color: Color::rgb(0x63, 0x66, 0xf1),
        font_mood: FontMood::Modern,
        composition: Composition::Centered,
    },
    Template {
        id: "vibrant_gradient",
        background: Background::LinearGradient {
            angle_deg: 135.0,
            from: Color::rgb(0x63, 0x66, 0xf1),
            to: Color::rgb(0xec, 0x48, 0x99),
        },
        text_color: Color::WHITE,
        accent_color: Color::rgb(0xfb, 0xbf, 0x24),
        font_mood: FontMood::Modern,
        composition: Composition::HeroBottom,
    },
    Template {
        id: "minimal_light",
        background: Background::Solid {
            color: Color::WHITE,
        },
        text_color: Color::rgb(0x1e, 0x29, 0x3b),
        accent_color: Color::rgb(0x10, 0xb9, 0x81),
        font_mood: FontMood::Modern,
        composition: Composition::MinimalTop,
    },
    Template {
        id: "midnight_neon",
        background: Background::Solid {
            color: Color::BLACK,
        },
        text_color: Color::rgb(0x00, 0xff, 0xcc),
        accent_color: Color::rgb(0xff, 0x00, 0xff),
        font_mood: FontMood::Bold,
        composition: Composition::MagazineLayout,
    },
];

/// Background colors offered by [`DesignEvent::RemixColor`].
pub const REMIX_COLORS: [Color; 6] = [
    Color::rgb(0x1e, 0x29, 0x3b),
    Color::rgb(0x0f, 0x17, 0x2a),
    Color::rgb(0x4c, 0x1d, 0x95),
    Color::rgb(0xbe, 0x18, 0x5d),
    Color::rgb(0x04, 0x78, 0x57),
    Color::rgb(0x00, 0x00, 0x00),
];

/// Headline prefixes offered by [`DesignEvent::RemixHeadline`].
pub const REMIX_PREFIXES: [&str; 4] = ["New: ", "Alert: ", "Hot: ", "Check this: "];

/// Which raster slot an asset event targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RasterTarget {
    /// [`DesignDescriptor::background_image`].
    Background,
    /// [`DesignDescriptor::logo`].
    Logo,
}

/// Editor state: the current descriptor plus which preset (if any) it came from.
#[derive(Clone, Debug, Default)]
pub struct DesignState {
    /// Descriptor the next render will use.
    pub descriptor: DesignDescriptor,
    /// Index into [`TEMPLATES`] of the last applied preset.
    pub template: Option<usize>,
}

impl DesignState {
    /// State wrapping a freshly normalized descriptor.
    pub fn new(descriptor: DesignDescriptor) -> Self {
        Self {
            descriptor,
            template: None,
        }
    }

    /// Slot addressed by `target`.
    pub fn slot(&self, target: RasterTarget) -> &RasterSlot {
        match target {
            RasterTarget::Background => &self.descriptor.background_image,
            RasterTarget::Logo => &self.descriptor.logo,
        }
    }

    fn slot_mut(&mut self, target: RasterTarget) -> &mut RasterSlot {
        match target {
            RasterTarget::Background => &mut self.descriptor.background_image,
            RasterTarget::Logo => &mut self.descriptor.logo,
        }
    }
}

/// Everything that can change the design between renders.
///
/// Random choices (`pick`) are made by the caller so that [`reduce`] stays a pure function.
#[derive(Clone, Debug)]
pub enum DesignEvent {
    /// Replace the descriptor with a newly generated one.
    Generated(DesignDescriptor),
    /// Apply preset `TEMPLATES[index % len]`.
    ApplyTemplate(usize),
    /// Apply the preset after the current one (the first if none is active).
    NextTemplate,
    /// Swap the background for `REMIX_COLORS[pick % len]`.
    RemixColor {
        /// Caller-chosen index.
        pick: usize,
    },
    /// Prefix the headline with `REMIX_PREFIXES[pick % len]`, replacing an earlier prefix.
    RemixHeadline {
        /// Caller-chosen index.
        pick: usize,
    },
    /// Replace the headline text (ignored when blank).
    SetHeadline(String),
    /// A raster finished loading.
    RasterReady {
        /// Slot to fill.
        target: RasterTarget,
        /// Decoded raster.
        raster: Raster,
    },
    /// A raster failed to load or decode.
    RasterFailed {
        /// Slot to mark failed.
        target: RasterTarget,
        /// Human-readable cause.
        reason: String,
    },
}

/// Apply `event` to `state` and return the next state.
pub fn reduce(mut state: DesignState, event: DesignEvent) -> DesignState {
    match event {
        DesignEvent::Generated(descriptor) => {
            state.descriptor = descriptor;
            state.template = None;
        }
        DesignEvent::ApplyTemplate(index) => {
            let index = index % TEMPLATES.len();
            TEMPLATES[index].apply_to(&mut state.descriptor);
            state.template = Some(index);
        }
        DesignEvent::NextTemplate => {
            let next = state.template.map_or(0, |i| (i + 1) % TEMPLATES.len());
            TEMPLATES[next].apply_to(&mut state.descriptor);
            state.template = Some(next);
        }
        DesignEvent::RemixColor { pick } => {
            let color = REMIX_COLORS[pick % REMIX_COLORS.len()];
            state.descriptor.background = Background::solid(color);
        }
        DesignEvent::RemixHeadline { pick } => {
            let prefix = REMIX_PREFIXES[pick % REMIX_PREFIXES.len()];
            let bare = strip_remix_prefix(&state.descriptor.headline);
            state.descriptor.headline = format!("{prefix}{bare}");
        }
        DesignEvent::SetHeadline(text) => {
            let text = text.trim();
            if !text.is_empty() {
                state.descriptor.headline = text.to_owned();
            }
        }
        DesignEvent::RasterReady { target, raster } => {
            *state.slot_mut(target) = RasterSlot::Ready(raster);
        }
        DesignEvent::RasterFailed { target, reason } => {
            *state.slot_mut(target) = RasterSlot::Failed(reason);
        }
    }
    state
}

fn strip_remix_prefix(headline: &str) -> &str {
    REMIX_PREFIXES
        .iter()
        .find_map(|p| headline.strip_prefix(p))
        .unwrap_or(headline)
}

#[cfg(test)]
#[path = "../../tests/unit/design/templates.rs"]
mod tests;
