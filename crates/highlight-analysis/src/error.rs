//! Error types for the analysis pipeline.

use highlight_core::HighlightError;
use thiserror::Error;

/// Errors that abort an analysis run.
///
/// Per-scene extraction problems are not errors at this level; they are
/// reported as [`crate::pipeline::SceneFailure`] records instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The source could not be read or a seek failed.
    #[error("Decode failed during {stage}: {source}")]
    DecodeFailure {
        stage: &'static str,
        #[source]
        source: HighlightError,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Wrap a collaborator error as a decode failure in `stage`.
    pub fn decode(stage: &'static str) -> impl FnOnce(HighlightError) -> Self {
        move |source| Self::DecodeFailure { stage, source }
    }
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
