//! Session error types.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while running an analysis.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The strokes could not be rasterized.
    #[error("Rendering error: {0}")]
    Render(#[from] inkwell_renderer::RenderError),

    /// The analysis could not be requested.
    #[error("Analysis error: {0}")]
    Analysis(#[from] inkwell_analysis::AnalysisError),
}
