//! Error types for media collaborators.

use thiserror::Error;

/// Main error type for decode, cut and encode operations.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for media operations.
pub type Result<T> = std::result::Result<T, HighlightError>;
