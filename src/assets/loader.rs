use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    assets::{
        decode::{decode_data_url, decode_image},
        raster::Raster,
    },
    design::{
        descriptor::RasterSource,
        templates::{DesignEvent, RasterTarget},
    },
    foundation::{
        core::Canvas,
        error::{LuminaError, LuminaResult},
    },
};

/// Settings for fetching remote rasters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Base URL of the prompt-to-image service; the prompt is appended as a path segment.
    pub image_endpoint: String,
    /// Whole-request timeout for one image fetch.
    pub timeout_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            image_endpoint: "https://image.pollinations.ai/prompt/".to_owned(),
            timeout_ms: 60_000,
        }
    }
}

/// Loads background photos and logos off the render path and reports them as design events.
#[derive(Clone, Debug)]
pub struct RasterLoader {
    http: reqwest::Client,
    config: LoaderConfig,
}

impl RasterLoader {
    /// Build a loader with its own HTTP client.
    pub fn new(config: LoaderConfig) -> LuminaResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("build raster http client")?;
        Ok(Self { http, config })
    }

    /// Image-generation URL for `prompt` at the canvas size.
    pub fn background_url(
        &self,
        prompt: &str,
        canvas: Canvas,
        seed: u64,
    ) -> LuminaResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.config.image_endpoint)
            .with_context(|| format!("parse image endpoint \"{}\"", self.config.image_endpoint))?;
        url.path_segments_mut()
            .map_err(|()| LuminaError::validation("image endpoint cannot carry a path"))?
            .pop_if_empty()
            .push(prompt.trim());
        url.query_pairs_mut()
            .append_pair("width", &canvas.width.to_string())
            .append_pair("height", &canvas.height.to_string())
            .append_pair("nologo", "true")
            .append_pair("seed", &seed.to_string());
        Ok(url)
    }

    /// GET `url` and decode the body.
    pub async fn fetch(&self, url: reqwest::Url) -> LuminaResult<Raster> {
        debug!(%url, "fetching raster");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LuminaError::asset(format!("GET {url} returned {status}")));
        }
        let bytes = resp.bytes().await.context("read raster body")?;
        decode_image(&bytes)
    }

    /// Resolve a background source to a raster.
    pub async fn load_background(
        &self,
        source: &RasterSource,
        canvas: Canvas,
        seed: u64,
    ) -> LuminaResult<Raster> {
        match source {
            RasterSource::Prompt(prompt) => {
                self.fetch(self.background_url(prompt, canvas, seed)?).await
            }
            RasterSource::Url(raw) => {
                let url = reqwest::Url::parse(raw)
                    .with_context(|| format!("parse image url \"{raw}\""))?;
                self.fetch(url).await
            }
            RasterSource::DataUrl(data) => decode_data_url(data),
        }
    }

    /// Load the background in a task and publish the outcome on `tx`.
    pub fn spawn_background(
        &self,
        source: RasterSource,
        canvas: Canvas,
        seed: u64,
        tx: mpsc::Sender<DesignEvent>,
    ) -> JoinHandle<()> {
        let loader = self.clone();
        tokio::spawn(async move {
            let result = loader.load_background(&source, canvas, seed).await;
            publish(RasterTarget::Background, result, &tx).await;
        })
    }

    /// Decode the logo data URL in a task and publish the outcome on `tx`.
    pub fn spawn_logo(&self, data_url: String, tx: mpsc::Sender<DesignEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || decode_data_url(&data_url))
                .await
                .map_err(|e| LuminaError::asset(format!("logo decode task failed: {e}")))
                .and_then(|r| r);
            publish(RasterTarget::Logo, result, &tx).await;
        })
    }
}

async fn publish(
    target: RasterTarget,
    result: LuminaResult<Raster>,
    tx: &mpsc::Sender<DesignEvent>,
) {
    let event = match result {
        Ok(raster) => {
            debug!(?target, width = raster.width, height = raster.height, "raster ready");
            DesignEvent::RasterReady { target, raster }
        }
        Err(e) => {
            warn!(?target, error = %e, "raster load failed");
            DesignEvent::RasterFailed {
                target,
                reason: e.to_string(),
            }
        }
    };
    if tx.send(event).await.is_err() {
        debug!(?target, "design session closed before raster arrived");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
