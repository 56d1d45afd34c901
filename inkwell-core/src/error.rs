//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Event or stroke serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A point coordinate was NaN or infinite.
    #[error("Invalid point ({x}, {y}): coordinates must be finite")]
    InvalidPoint {
        /// X coordinate as received.
        x: f32,
        /// Y coordinate as received.
        y: f32,
    },
}
