//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing surface could not be created.
    #[error("Canvas unavailable: {0}")]
    Canvas(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// Data URL was malformed.
    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    /// Base64 payload could not be decoded.
    #[error("Failed to decode base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
