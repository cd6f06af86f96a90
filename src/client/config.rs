use std::{fs::File, io::BufReader, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    client::retry::RetryPolicy,
    foundation::error::{LuminaError, LuminaResult},
};

/// Tunables for [`crate::client::GenerationClient`].
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `generateContent` URL; the credential is appended as the `key` query parameter.
    pub endpoint: String,
    /// Deadline for a single HTTP attempt; expiry ends the call without retrying.
    pub timeout_ms: u64,
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles on each retry.
    pub base_delay_ms: u64,
    /// Upper bound (exclusive) of the uniform jitter added to every backoff.
    pub max_jitter_ms: u64,
}

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_ms: 15_000,
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_jitter_ms: 1_000,
        }
    }
}

impl ClientConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> LuminaResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| LuminaError::serde(format!("parse client config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LuminaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LuminaError::validation(format!("open client config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject configs the client cannot run with.
    pub fn validate(&self) -> LuminaResult<()> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| LuminaError::validation(format!("endpoint '{}': {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LuminaError::validation(format!(
                "endpoint scheme must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_ms == 0 {
            return Err(LuminaError::validation("timeout_ms must be > 0"));
        }
        if self.max_attempts == 0 {
            return Err(LuminaError::validation("max_attempts must be >= 1"));
        }
        Ok(())
    }

    /// Deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Backoff schedule described by this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_jitter: Duration::from_millis(self.max_jitter_ms),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/client/config.rs"]
mod tests;
