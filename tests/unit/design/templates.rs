use std::sync::Arc;

use super::*;
use crate::design::descriptor::{OverlayStyle, RasterSource};

fn state() -> DesignState {
    DesignState::new(DesignDescriptor::with_headline("Grand Opening"))
}

fn tiny_raster() -> Raster {
    Raster {
        width: 1,
        height: 1,
        rgba8_premul: Arc::new(vec![255, 0, 0, 255]),
    }
}

#[test]
fn next_template_cycles_and_keeps_text() {
    let mut s = state();
    s.descriptor.overlay_style = OverlayStyle::Vignette;

    s = reduce(s, DesignEvent::NextTemplate);
    assert_eq!(s.template, Some(0));
    for expected in [1, 2, 3, 0] {
        s = reduce(s, DesignEvent::NextTemplate);
        assert_eq!(s.template, Some(expected));
    }
    assert_eq!(s.descriptor.headline, "Grand Opening");
    assert_eq!(s.descriptor.overlay_style, OverlayStyle::Vignette);
}

#[test]
fn apply_template_sets_palette_and_layout() {
    let s = reduce(state(), DesignEvent::ApplyTemplate(3));
    let d = &s.descriptor;
    assert_eq!(d.background, Background::solid(Color::BLACK));
    assert_eq!(d.text_color, Color::rgb(0x00, 0xff, 0xcc));
    assert_eq!(d.accent_color, Color::rgb(0xff, 0x00, 0xff));
    assert_eq!(d.composition, Composition::MagazineLayout);

    let wrapped = reduce(state(), DesignEvent::ApplyTemplate(5));
    assert_eq!(wrapped.template, Some(1));
    assert!(matches!(
        wrapped.descriptor.background,
        Background::LinearGradient { .. }
    ));
}

#[test]
fn remix_headline_replaces_existing_prefix() {
    let s = reduce(state(), DesignEvent::RemixHeadline { pick: 0 });
    assert_eq!(s.descriptor.headline, "New: Grand Opening");
    let s = reduce(s, DesignEvent::RemixHeadline { pick: 3 });
    assert_eq!(s.descriptor.headline, "Check this: Grand Opening");
    let s = reduce(s, DesignEvent::RemixHeadline { pick: 5 });
    assert_eq!(s.descriptor.headline, "Alert: Grand Opening");
}

#[test]
fn remix_color_picks_from_palette() {
    let s = reduce(state(), DesignEvent::RemixColor { pick: 2 });
    assert_eq!(
        s.descriptor.background,
        Background::solid(Color::rgb(0x4c, 0x1d, 0x95))
    );
    let s = reduce(s, DesignEvent::RemixColor { pick: 6 });
    assert_eq!(s.descriptor.background, Background::solid(REMIX_COLORS[0]));
}

#[test]
fn set_headline_ignores_blank_text() {
    let s = reduce(state(), DesignEvent::SetHeadline("  ".into()));
    assert_eq!(s.descriptor.headline, "Grand Opening");
    let s = reduce(s, DesignEvent::SetHeadline(" Doors open at 9 ".into()));
    assert_eq!(s.descriptor.headline, "Doors open at 9");
}

#[test]
fn raster_events_fill_and_fail_slots() {
    let mut s = state();
    s.descriptor.background_image = RasterSlot::Pending(RasterSource::Prompt("beach".into()));

    let s = reduce(
        s,
        DesignEvent::RasterReady {
            target: RasterTarget::Background,
            raster: tiny_raster(),
        },
    );
    assert_eq!(s.slot(RasterTarget::Background).ready().map(|r| r.width), Some(1));
    assert!(matches!(s.slot(RasterTarget::Logo), RasterSlot::Absent));

    let s = reduce(
        s,
        DesignEvent::RasterFailed {
            target: RasterTarget::Logo,
            reason: "bad data url".into(),
        },
    );
    assert!(matches!(s.slot(RasterTarget::Logo), RasterSlot::Failed(r) if r == "bad data url"));

    let s = reduce(s, DesignEvent::Generated(DesignDescriptor::default()));
    assert!(s.template.is_none());
    assert!(matches!(s.slot(RasterTarget::Background), RasterSlot::Absent));
}
