//! Error types for sagar-core

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;
use crate::types::{UploadId, UploadStatus, ValidationError};

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors surfaced by [`Processor::process`](crate::Processor::process)
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The upload id is unknown. Upload status is untouched.
    #[error("Upload not found: {0}")]
    NotFound(UploadId),

    /// The upload was not `pending` when processing started. Upload status is untouched.
    #[error("Invalid upload state: expected {expected}, got {actual}")]
    InvalidState {
        expected: UploadStatus,
        actual: UploadStatus,
    },

    /// A store read or write failed.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// A generated record violated its field constraints.
    #[error("Computation failure: {0}")]
    Computation(#[from] ValidationError),

    /// The pipeline configuration is unusable. Raised mid-run, so the
    /// upload has already been claimed and is marked `failed`.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Whether the upload status was left as it was before the call.
    pub fn leaves_status_unchanged(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidState { .. })
    }
}
