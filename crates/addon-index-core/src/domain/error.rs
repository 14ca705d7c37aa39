//! Error taxonomy for one update run.

use addon_store::StorageError;
use registry_client::ClientError;

/// Fatal pipeline errors.
///
/// Per-package enrichment failures are not errors; they are collected in the
/// run report instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("discovery failed at offset {offset}: {source}")]
    Discovery {
        offset: usize,
        #[source]
        source: ClientError,
    },

    #[error("quality data unavailable: {0}")]
    Scoring(#[source] ClientError),

    #[error("snapshot persistence failed: {0}")]
    Persistence(#[source] StorageError),

    #[error("metric store error: {0}")]
    MetricStore(#[source] StorageError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Discovery { .. } => 2,
            PipelineError::Scoring(_) => 3,
            PipelineError::Persistence(_) => 4,
            PipelineError::MetricStore(_) => 5,
            PipelineError::Serialization(_) => 6,
            PipelineError::Config(_) => 64,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
