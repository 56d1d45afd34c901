//! Analysis error types.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while requesting or reading an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key was configured.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The endpoint URL is malformed.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// The drawing could not be attached to the request.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] inkwell_renderer::RenderError),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("analysis HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed unexpectedly.
    #[error("failed to parse analysis payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The model endpoint returned an error status.
    #[error("model API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The prompt was blocked by the model's safety filters.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The model replied without any text.
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl AnalysisError {
    /// Returns true for transport failures that happen before any reply.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
