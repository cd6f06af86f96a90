//! Resilient client for the text-generation endpoint.

/// Endpoint, deadline and backoff settings.
pub mod config;
/// Wire types and payload parsing.
pub mod envelope;
/// The `generate` loop and its outcome types.
pub mod generate;
/// Profile, brand context and prompt construction.
pub mod request;
/// Backoff schedule and the sleeper seam.
pub mod retry;
/// HTTP seam.
pub mod transport;

pub use config::ClientConfig;
pub use envelope::GeneratedPost;
pub use generate::{Failure, FailureKind, GenerationClient, GenerationResult};
pub use request::{BrandContext, GenerationRequest, Profile};
pub use retry::{RetryPolicy, RetryState, Sleeper, TokioSleeper};
pub use transport::{HttpReply, ReqwestTransport, Transport, TransportFailure};
