use serde::Serialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    assets::loader::RasterLoader,
    client::{
        generate::{Failure, GenerationClient, GenerationResult},
        request::Profile,
    },
    design::{
        descriptor::{DesignDescriptor, RasterSlot, RasterSource},
        normalize::{NormalizeContext, normalize_with},
        templates::{DesignEvent, DesignState},
    },
    foundation::core::Canvas,
};

/// Everything needed to publish one post, whether or not generation succeeded.
#[derive(Clone, Debug, Serialize)]
pub struct PostDraft {
    /// Topic as given by the user.
    pub topic: String,
    /// Post caption; empty when generation failed.
    pub caption: String,
    /// Hashtags; empty when generation failed.
    pub hashtags: Vec<String>,
    /// Fully resolved design, with raster slots pending where assets are expected.
    pub descriptor: DesignDescriptor,
    /// Why generation failed, kept so the caller can choose its own fallback.
    pub failure: Option<Failure>,
}

impl PostDraft {
    /// Fresh editor state around this draft's descriptor.
    pub fn state(&self) -> DesignState {
        DesignState::new(self.descriptor.clone())
    }

    /// Start loading every pending raster; results arrive on `tx` as design events.
    pub fn request_rasters(
        &self,
        loader: &RasterLoader,
        canvas: Canvas,
        seed: u64,
        tx: &mpsc::Sender<DesignEvent>,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if let Some(source) = self.descriptor.background_image.pending() {
            handles.push(loader.spawn_background(source.clone(), canvas, seed, tx.clone()));
        }
        if let Some(RasterSource::DataUrl(data_url)) = self.descriptor.logo.pending() {
            handles.push(loader.spawn_logo(data_url.clone(), tx.clone()));
        }
        handles
    }
}

/// Generate copy for `topic` and resolve it into a renderable draft.
///
/// Failures still yield a draft: the descriptor then holds the defaults and a headline derived
/// from the topic.
pub async fn draft_post(client: &GenerationClient, topic: &str, profile: &Profile) -> PostDraft {
    let brand_name = profile.brand.business_name.as_deref();
    let mut draft = match client.generate(topic, profile).await {
        GenerationResult::Success(post) => {
            let ctx = NormalizeContext {
                topic,
                headline: Some(post.headline.as_str()),
                brand_name,
            };
            let descriptor = normalize_with(post.design.as_ref(), &ctx);
            PostDraft {
                topic: topic.to_owned(),
                caption: post.caption,
                hashtags: post.hashtags,
                descriptor,
                failure: None,
            }
        }
        GenerationResult::Failure(failure) => {
            let ctx = NormalizeContext {
                topic,
                headline: None,
                brand_name,
            };
            PostDraft {
                topic: topic.to_owned(),
                caption: String::new(),
                hashtags: Vec::new(),
                descriptor: normalize_with(None, &ctx),
                failure: Some(failure),
            }
        }
    };

    if let Some(logo) = profile
        .logo_data_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        draft.descriptor.logo = RasterSlot::Pending(RasterSource::DataUrl(logo.to_owned()));
    }
    tracing::debug!(
        generated = draft.failure.is_none(),
        headline = %draft.descriptor.headline,
        "draft ready"
    );
    draft
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
