/// Convenience result type used across Lumina.
pub type LuminaResult<T> = Result<T, LuminaError>;

/// Library error taxonomy for everything outside the generation client.
///
/// The generation client reports its outcomes through
/// [`crate::client::Failure`] instead, because callers branch on the failure kind.
#[derive(thiserror::Error, Debug)]
pub enum LuminaError {
    /// Invalid user-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors inside a compositing helper (buffer sizes, raster allocation).
    #[error("render error: {0}")]
    Render(String),

    /// Errors while fetching or decoding raster assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LuminaError {
    /// Build a [`LuminaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LuminaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LuminaError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`LuminaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
