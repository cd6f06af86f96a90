use async_trait::async_trait;

use crate::{
    client::envelope::GeminiRequest,
    foundation::error::{LuminaError, LuminaResult},
};

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpReply {
    /// Reply with a UTF-8 body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `2xx`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `429 Too Many Requests` or `503 Service Unavailable`.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status, 429 | 503)
    }
}

/// An exchange that produced no HTTP status.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    /// The request could not be built (bad URL, unserializable body).
    #[error("could not build request: {0}")]
    Build(String),
    /// Connection refused, reset or failed TLS.
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request was sent but the exchange broke before a status arrived.
    #[error("request failed: {0}")]
    Request(String),
    /// The status arrived but the body could not be read.
    #[error("reading response body failed: {0}")]
    Body(String),
}

impl TransportFailure {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Build(_))
    }
}

/// Sends one generation request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `url`.
    async fn post_json(
        &self,
        url: &reqwest::Url,
        body: &GeminiRequest,
    ) -> Result<HttpReply, TransportFailure>;
}

/// [`Transport`] over a shared `reqwest` client.
///
/// The client sets no timeout of its own; the deadline belongs to the caller.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with a freshly built client.
    pub fn new() -> LuminaResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LuminaError::validation(format!("build http client: {e}")))?;
        Ok(Self { http })
    }

    /// Transport reusing an existing client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &reqwest::Url,
        body: &GeminiRequest,
    ) -> Result<HttpReply, TransportFailure> {
        let resp = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportFailure::Body(e.without_url().to_string()))?;
        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}

// The URL carries the credential, so it is stripped before the error is rendered.
fn classify(e: reqwest::Error) -> TransportFailure {
    let builder = e.is_builder();
    let connect = e.is_connect();
    let msg = e.without_url().to_string();
    if builder {
        TransportFailure::Build(msg)
    } else if connect {
        TransportFailure::Connect(msg)
    } else {
        TransportFailure::Request(msg)
    }
}
