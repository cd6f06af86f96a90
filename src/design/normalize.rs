use serde_json::Value;

use crate::design::{
    color::{Background, Color},
    descriptor::{
        Composition, DesignDescriptor, FontMood, ImageFilter, OverlayStyle, RasterSlot,
        RasterSource,
    },
};

/// Non-model inputs the normalizer needs to fill gaps in the raw design.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizeContext<'a> {
    /// User topic; seeds the placeholder headline.
    pub topic: &'a str,
    /// Headline returned by the model, untrimmed.
    pub headline: Option<&'a str>,
    /// Business name used for the watermark handle.
    pub brand_name: Option<&'a str>,
}

/// Resolve raw design data into a descriptor using only documented defaults.
pub fn normalize(raw: Option<&Value>) -> DesignDescriptor {
    normalize_with(raw, &NormalizeContext::default())
}

/// Resolve raw design data into a descriptor.
///
/// This is the only place untrusted model output is interpreted. It never fails: absent, mistyped
/// or unknown values are replaced by the defaults on [`DesignDescriptor`].
pub fn normalize_with(raw: Option<&Value>, ctx: &NormalizeContext<'_>) -> DesignDescriptor {
    let mut out = DesignDescriptor::with_headline(resolve_headline(ctx));
    out.watermark = resolve_watermark(ctx.brand_name);

    let Some(design) = raw.and_then(Value::as_object) else {
        return out;
    };
    let text = |key: &str| design.get(key).and_then(Value::as_str).map(str::trim);

    if let Some(bg) = text("background_color").and_then(Background::parse) {
        out.background = bg;
    }
    if let Some(c) = text("text_color").and_then(Color::parse_hex) {
        out.text_color = c;
    }
    if let Some(c) = text("accent_color").and_then(Color::parse_hex) {
        out.accent_color = c;
    }

    out.overlay_style = text("overlay_style")
        .and_then(OverlayStyle::from_raw)
        .unwrap_or_default();
    out.composition = text("composition")
        .and_then(Composition::from_raw)
        .or_else(|| text("layout").and_then(Composition::from_legacy_layout))
        .unwrap_or_default();
    out.font_mood = text("font_mood")
        .and_then(FontMood::from_raw)
        .unwrap_or_default();
    out.image_filter = text("image_filter")
        .and_then(ImageFilter::from_raw)
        .unwrap_or_default();

    let non_blank = |s: &&str| !s.is_empty();
    out.background_image = match (
        text("image_url").filter(non_blank),
        text("image_prompt").filter(non_blank),
    ) {
        (Some(url), _) => RasterSlot::Pending(RasterSource::Url(url.to_owned())),
        (None, Some(prompt)) => RasterSlot::Pending(RasterSource::Prompt(prompt.to_owned())),
        (None, None) => RasterSlot::Absent,
    };

    out
}

fn resolve_headline(ctx: &NormalizeContext<'_>) -> String {
    if let Some(h) = ctx.headline.map(str::trim).filter(|h| !h.is_empty()) {
        return h.to_owned();
    }
    let topic = ctx.topic.trim();
    if topic.is_empty() {
        DesignDescriptor::FALLBACK_HEADLINE.to_owned()
    } else {
        format!("Update about {topic}")
    }
}

fn resolve_watermark(brand_name: Option<&str>) -> String {
    match brand_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("@{name}"),
        None => DesignDescriptor::DEFAULT_WATERMARK.to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/design/normalize.rs"]
mod tests;
