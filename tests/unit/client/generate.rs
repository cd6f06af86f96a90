use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use super::*;
use crate::client::{envelope::GeminiRequest, transport::TransportFailure};

type Step = Result<HttpReply, TransportFailure>;

/// Replays a fixed script of replies; an exhausted script hangs forever.
#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl ScriptedTransport {
    fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &reqwest::Url,
        _body: &GeminiRequest,
    ) -> Result<HttpReply, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(step) => step,
            None => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

fn profile() -> Profile {
    Profile {
        credential: Some("test-key".into()),
        ..Profile::default()
    }
}

fn client(transport: Arc<ScriptedTransport>, sleeper: Arc<RecordingSleeper>) -> GenerationClient {
    GenerationClient::with_transport(ClientConfig::default(), transport, sleeper)
}

fn ok_reply(payload: &str) -> Step {
    let body = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": payload }], "role": "model" } }]
    });
    Ok(HttpReply::new(200, body.to_string()))
}

const PAYLOAD: &str = r##"```json
{"headline": "Flash Sale Today", "caption": "Don't miss it", "hashtags": "#sale #deals", "design": {"composition": "hero-bottom"}}
```"##;

fn failure(r: GenerationResult) -> Failure {
    match r {
        GenerationResult::Failure(f) => f,
        GenerationResult::Success(p) => panic!("expected failure, got {p:?}"),
    }
}

#[tokio::test]
async fn missing_credential_makes_no_attempt() {
    let t = ScriptedTransport::new([ok_reply(PAYLOAD)]);
    let s = Arc::new(RecordingSleeper::default());
    let c = client(t.clone(), s.clone());

    for credential in [None, Some("   ".to_owned())] {
        let p = Profile {
            credential,
            ..Profile::default()
        };
        let f = failure(c.generate("Flash Sale", &p).await);
        assert_eq!(f.kind, FailureKind::MissingCredential);
    }
    assert_eq!(t.calls(), 0);
    assert!(s.waits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_topic_is_rejected_before_sending() {
    let t = ScriptedTransport::new([ok_reply(PAYLOAD)]);
    let c = client(t.clone(), Arc::new(RecordingSleeper::default()));
    let f = failure(c.generate("  ", &profile()).await);
    assert_eq!(f.kind, FailureKind::InvalidRequest);
    assert_eq!(t.calls(), 0);
}

#[tokio::test]
async fn success_parses_fenced_payload_and_sends_key() {
    let t = ScriptedTransport::new([ok_reply(PAYLOAD)]);
    let c = client(t.clone(), Arc::new(RecordingSleeper::default()));

    let post = c.generate("Flash Sale", &profile()).await.into_result().unwrap();
    assert_eq!(post.headline, "Flash Sale Today");
    assert_eq!(post.hashtags, vec!["#sale", "#deals"]);
    assert_eq!(post.design.unwrap()["composition"], "hero-bottom");
    assert_eq!(t.calls(), 1);
    assert!(t.last_url.lock().unwrap().as_deref().unwrap().ends_with("?key=test-key"));
}

#[tokio::test]
async fn rate_limits_back_off_exponentially_then_succeed() {
    let t = ScriptedTransport::new([
        Ok(HttpReply::new(429, "")),
        Ok(HttpReply::new(429, "")),
        ok_reply(PAYLOAD),
    ]);
    let s = Arc::new(RecordingSleeper::default());
    let c = client(t.clone(), s.clone());

    assert!(c.generate("Flash Sale", &profile()).await.is_success());
    assert_eq!(t.calls(), 3);

    let waits = s.waits.lock().unwrap().clone();
    assert_eq!(waits.len(), 2);
    assert!(waits[0] >= Duration::from_secs(1) && waits[0] < Duration::from_secs(2));
    assert!(waits[1] >= Duration::from_secs(2) && waits[1] < Duration::from_secs(3));
}

#[tokio::test]
async fn exhausted_unavailable_becomes_transport_error_without_final_sleep() {
    let t = ScriptedTransport::new((0..3).map(|_| Ok(HttpReply::new(503, ""))));
    let s = Arc::new(RecordingSleeper::default());
    let c = client(t.clone(), s.clone());

    let f = failure(c.generate("Flash Sale", &profile()).await);
    assert_eq!(f.kind, FailureKind::TransportError);
    assert_eq!(f.status, Some(503));
    assert_eq!(t.calls(), 3);
    assert_eq!(s.waits.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn deadline_expiry_is_terminal() {
    let t = ScriptedTransport::new([]);
    let s = Arc::new(RecordingSleeper::default());
    let c = client(t.clone(), s.clone());

    let f = failure(c.generate("Flash Sale", &profile()).await);
    assert_eq!(f.kind, FailureKind::Timeout);
    assert_eq!(t.calls(), 1);
    assert!(s.waits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn other_statuses_are_protocol_errors_after_one_attempt() {
    for status in [400, 401, 500] {
        let t = ScriptedTransport::new([Ok(HttpReply::new(status, "oops"))]);
        let c = client(t.clone(), Arc::new(RecordingSleeper::default()));
        let f = failure(c.generate("Flash Sale", &profile()).await);
        assert_eq!(f.kind, FailureKind::ProtocolError);
        assert_eq!(f.status, Some(status));
        assert_eq!(t.calls(), 1);
    }
}

#[tokio::test]
async fn success_without_candidates_is_protocol_error() {
    let t = ScriptedTransport::new([Ok(HttpReply::new(200, r#"{"candidates": []}"#))]);
    let c = client(t.clone(), Arc::new(RecordingSleeper::default()));
    let f = failure(c.generate("Flash Sale", &profile()).await);
    assert_eq!(f.kind, FailureKind::ProtocolError);
    assert_eq!(f.status, Some(200));
}

#[tokio::test]
async fn non_json_payload_is_invalid_and_not_retried() {
    let t = ScriptedTransport::new([ok_reply("Sure! Here is your post."), ok_reply(PAYLOAD)]);
    let c = client(t.clone(), Arc::new(RecordingSleeper::default()));
    let f = failure(c.generate("Flash Sale", &profile()).await);
    assert_eq!(f.kind, FailureKind::InvalidPayload);
    assert_eq!(t.calls(), 1);
}

#[tokio::test]
async fn connection_errors_are_retried() {
    let t = ScriptedTransport::new([
        Err(TransportFailure::Connect("refused".into())),
        ok_reply(PAYLOAD),
    ]);
    let s = Arc::new(RecordingSleeper::default());
    let c = client(t.clone(), s.clone());
    assert!(c.generate("Flash Sale", &profile()).await.is_success());
    assert_eq!(t.calls(), 2);
    assert_eq!(s.waits.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn persistent_connection_errors_surface_as_transport_error() {
    let t = ScriptedTransport::new((0..3).map(|_| Err(TransportFailure::Body("reset".into()))));
    let c = client(t.clone(), Arc::new(RecordingSleeper::default()));
    let f = failure(c.generate("Flash Sale", &profile()).await);
    assert_eq!(f.kind, FailureKind::TransportError);
    assert_eq!(f.status, None);
    assert!(f.message.contains("reset"));
    assert_eq!(t.calls(), 3);
}

#[tokio::test]
async fn build_errors_are_not_retried() {
    let t = ScriptedTransport::new([Err(TransportFailure::Build("bad".into())), ok_reply(PAYLOAD)]);
    let c = client(t.clone(), Arc::new(RecordingSleeper::default()));
    let f = failure(c.generate("Flash Sale", &profile()).await);
    assert_eq!(f.kind, FailureKind::TransportError);
    assert_eq!(t.calls(), 1);
}

#[test]
fn failure_display_includes_kind() {
    let f = Failure::new(FailureKind::Timeout, "no response within 15000 ms");
    assert_eq!(f.to_string(), "timeout: no response within 15000 ms");
}
