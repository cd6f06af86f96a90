use std::{
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};

use super::*;
use crate::{
    assets::loader::LoaderConfig,
    client::{
        config::ClientConfig,
        envelope::GeminiRequest,
        generate::FailureKind,
        retry::Sleeper,
        transport::{HttpReply, Transport, TransportFailure},
    },
    design::{
        descriptor::{Composition, OverlayStyle},
        templates::RasterTarget,
    },
};

/// Answers every call with the same status and body.
struct FixedTransport {
    status: u16,
    body: String,
    calls: AtomicUsize,
}

impl FixedTransport {
    fn new(status: u16, body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.into(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Transport for FixedTransport {
    async fn post_json(
        &self,
        _url: &reqwest::Url,
        _body: &GeminiRequest,
    ) -> Result<HttpReply, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HttpReply::new(self.status, self.body.clone()))
    }
}

struct NoSleep;

#[async_trait]
impl Sleeper for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}

fn client(transport: Arc<FixedTransport>) -> GenerationClient {
    GenerationClient::with_transport(ClientConfig::default(), transport, Arc::new(NoSleep))
}

fn profile() -> Profile {
    Profile {
        credential: Some("k".into()),
        brand: crate::client::request::BrandContext {
            business_name: Some("Bean There".into()),
            ..Default::default()
        },
        ..Profile::default()
    }
}

fn model_reply(post: serde_json::Value) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": post.to_string() }] } }]
    })
    .to_string()
}

fn logo_data_url() -> String {
    let img = image::RgbaImage::from_raw(1, 1, vec![255, 0, 0, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(&buf))
}

#[tokio::test]
async fn success_resolves_design_and_copy() {
    let transport = FixedTransport::new(
        200,
        model_reply(serde_json::json!({
            "headline": "Latte Art Night",
            "caption": "Join us Friday.",
            "hashtags": ["#coffee", "#latte"],
            "design": {
                "background_color": "#102030",
                "overlay_style": "vignette",
                "composition": "hero-bottom",
                "image_prompt": "warm cafe interior"
            }
        })),
    );
    let draft = draft_post(&client(transport.clone()), "latte art", &profile()).await;

    assert!(draft.failure.is_none());
    assert_eq!(draft.caption, "Join us Friday.");
    assert_eq!(draft.hashtags, vec!["#coffee", "#latte"]);
    let d = &draft.descriptor;
    assert_eq!(d.headline, "Latte Art Night");
    assert_eq!(d.watermark, "@Bean There");
    assert_eq!(d.overlay_style, OverlayStyle::Vignette);
    assert_eq!(d.composition, Composition::HeroBottom);
    assert_eq!(
        d.background_image.pending(),
        Some(&RasterSource::Prompt("warm cafe interior".into()))
    );
    assert!(matches!(d.logo, RasterSlot::Absent));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failure_still_yields_default_draft() {
    let transport = FixedTransport::new(400, "bad request");
    let draft = draft_post(&client(transport), "Flash Sale", &profile()).await;

    let failure = draft.failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::ProtocolError);
    assert!(draft.caption.is_empty());
    assert!(draft.hashtags.is_empty());
    assert_eq!(draft.descriptor.headline, "Update about Flash Sale");
    assert_eq!(draft.descriptor.overlay_style, OverlayStyle::GradientBottom);
    assert!(matches!(draft.descriptor.background_image, RasterSlot::Absent));
}

#[tokio::test]
async fn profile_logo_becomes_pending_slot() {
    let transport = FixedTransport::new(200, model_reply(serde_json::json!({ "headline": "Hi" })));
    let mut p = profile();
    p.logo_data_url = Some(format!("  {}  ", logo_data_url()));

    let draft = draft_post(&client(transport), "hello", &p).await;
    match draft.descriptor.logo.pending() {
        Some(RasterSource::DataUrl(url)) => assert!(url.starts_with("data:image/png;base64,")),
        other => panic!("unexpected logo slot {other:?}"),
    }
}

#[tokio::test]
async fn request_rasters_loads_logo_into_state() {
    let transport = FixedTransport::new(200, model_reply(serde_json::json!({ "headline": "Hi" })));
    let mut p = profile();
    p.logo_data_url = Some(logo_data_url());
    let draft = draft_post(&client(transport), "hello", &p).await;

    let loader = RasterLoader::new(LoaderConfig::default()).unwrap();
    let (tx, mut rx) = mpsc::channel(4);
    let handles = draft.request_rasters(&loader, Canvas::square(64).unwrap(), 1, &tx);
    drop(tx);
    assert_eq!(handles.len(), 1);
    for h in handles {
        h.await.unwrap();
    }

    let event = rx.recv().await.unwrap();
    assert!(matches!(
        event,
        DesignEvent::RasterReady {
            target: RasterTarget::Logo,
            ..
        }
    ));
    let state = crate::design::templates::reduce(draft.state(), event);
    assert!(state.descriptor.logo.ready().is_some());
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn draft_serializes_for_callers() {
    let transport = FixedTransport::new(503, "");
    let draft = draft_post(&client(transport), "x", &profile()).await;
    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["failure"]["kind"], "transport_error");
    assert_eq!(json["descriptor"]["logo"], "absent");
}
