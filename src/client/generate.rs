use std::{fmt, sync::Arc};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    client::{
        config::ClientConfig,
        envelope::{GeneratedPost, extract_text, parse_payload},
        request::{GenerationRequest, Profile},
        retry::{RetryState, Sleeper, TokioSleeper},
        transport::{HttpReply, ReqwestTransport, Transport},
    },
    foundation::error::LuminaResult,
};

/// Why a generation call produced no post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The profile carries no API key. No request was sent.
    MissingCredential,
    /// The topic is blank. No request was sent.
    InvalidRequest,
    /// An attempt outlived the deadline.
    Timeout,
    /// Non-retryable HTTP status, or a 2xx without candidate text.
    ProtocolError,
    /// Network failure or rate limiting that persisted through every attempt.
    TransportError,
    /// Candidate text is not a JSON post object.
    InvalidPayload,
}

impl FailureKind {
    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidRequest => "invalid_request",
            Self::Timeout => "timeout",
            Self::ProtocolError => "protocol_error",
            Self::TransportError => "transport_error",
            Self::InvalidPayload => "invalid_payload",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified generation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    /// Classification callers branch on.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub message: String,
    /// Last HTTP status seen, when there was one.
    pub status: Option<u16>,
}

impl Failure {
    /// Failure without an HTTP status.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Attach the HTTP status that caused this failure.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Outcome of [`GenerationClient::generate`].
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationResult {
    /// Parsed post.
    Success(GeneratedPost),
    /// Classified failure.
    Failure(Failure),
}

impl GenerationResult {
    /// `true` for [`GenerationResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<GeneratedPost, Failure> {
        match self {
            Self::Success(post) => Ok(post),
            Self::Failure(f) => Err(f),
        }
    }
}

impl From<Result<GeneratedPost, Failure>> for GenerationResult {
    fn from(r: Result<GeneratedPost, Failure>) -> Self {
        match r {
            Ok(post) => Self::Success(post),
            Err(f) => Self::Failure(f),
        }
    }
}

/// Resilient client for the text-generation endpoint.
///
/// Holds no per-request state, so one client can serve concurrent calls.
#[derive(Clone)]
pub struct GenerationClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    /// Client over HTTPS with real sleeps.
    pub fn new(config: ClientConfig) -> LuminaResult<Self> {
        config.validate()?;
        Ok(Self::with_transport(
            config,
            Arc::new(ReqwestTransport::new()?),
            Arc::new(TokioSleeper),
        ))
    }

    /// Client with injected transport and sleeper.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config,
            transport,
            sleeper,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request a post about `topic` for the brand in `profile`.
    ///
    /// Never returns an empty success: every outcome without a parsed post is a classified
    /// [`Failure`].
    #[tracing::instrument(skip(self, profile))]
    pub async fn generate(&self, topic: &str, profile: &Profile) -> GenerationResult {
        let result = match GenerationRequest::from_profile(topic, profile) {
            Ok(request) => self.run(&request).await,
            Err(f) => Err(f),
        };
        match &result {
            Ok(post) => info!(headline = %post.headline, "generation succeeded"),
            Err(f) => warn!(
                kind = %f.kind,
                status = ?f.status,
                message = %f.message,
                "generation failed"
            ),
        }
        result.into()
    }

    async fn run(&self, request: &GenerationRequest) -> Result<GeneratedPost, Failure> {
        let url = self.request_url(request)?;
        let body = request.body();
        let policy = self.config.retry_policy();
        let deadline = self.config.timeout();
        let mut state = RetryState::start(&policy);

        loop {
            debug!(attempt = state.attempt + 1, "sending generation request");
            let exchange =
                tokio::time::timeout(deadline, self.transport.post_json(&url, &body)).await;

            let failure = match exchange {
                Err(_) => {
                    return Err(Failure::new(
                        FailureKind::Timeout,
                        format!("no response within {} ms", deadline.as_millis()),
                    ));
                }
                Ok(Ok(reply)) if reply.is_success() => return decode(&reply),
                Ok(Ok(reply)) if reply.is_rate_limited() => Failure::new(
                    FailureKind::TransportError,
                    format!("service busy (HTTP {})", reply.status),
                )
                .with_status(reply.status),
                Ok(Ok(reply)) => {
                    return Err(Failure::new(
                        FailureKind::ProtocolError,
                        format!("unexpected HTTP {}", reply.status),
                    )
                    .with_status(reply.status));
                }
                Ok(Err(e)) if e.is_retryable() => {
                    Failure::new(FailureKind::TransportError, e.to_string())
                }
                Ok(Err(e)) => return Err(Failure::new(FailureKind::TransportError, e.to_string())),
            };

            if state.is_last(&policy) {
                return Err(failure);
            }

            let wait = state.current_delay.saturating_add(policy.jitter());
            warn!(
                attempt = state.attempt + 1,
                max_attempts = policy.max_attempts,
                wait_ms = wait.as_millis() as u64,
                elapsed_ms = state.started_at.elapsed().as_millis() as u64,
                reason = %failure,
                "retrying generation request"
            );
            self.sleeper.sleep(wait).await;
            state.advance(&policy);
        }
    }

    fn request_url(&self, request: &GenerationRequest) -> Result<reqwest::Url, Failure> {
        let mut url = reqwest::Url::parse(&self.config.endpoint).map_err(|e| {
            Failure::new(FailureKind::InvalidRequest, format!("bad endpoint: {e}"))
        })?;
        url.query_pairs_mut().append_pair("key", request.credential());
        Ok(url)
    }
}

fn decode(reply: &HttpReply) -> Result<GeneratedPost, Failure> {
    let text = extract_text(&reply.body).map_err(|f| f.with_status(reply.status))?;
    parse_payload(&text)
}

#[cfg(test)]
#[path = "../../tests/unit/client/generate.rs"]
mod tests;
