//! Uploaded sequencing files and their processing status.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UploadId;

/// File format of an upload, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    Fastq,
    Fasta,
}

impl UploadFormat {
    /// Detect the format from a file name (`.fastq`, `.fq`, `.fasta`, `.fa`).
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "fastq" | "fq" => Some(Self::Fastq),
            "fasta" | "fa" => Some(Self::Fasta),
            _ => None,
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fastq => write!(f, "fastq"),
            Self::Fasta => write!(f, "fasta"),
        }
    }
}

/// Processing status of an upload. The status doubles as the
/// at-most-one-run lock: only a `pending` upload may be claimed.
///
/// ```text
/// pending ──▶ processing ──▶ completed
///    ▲             └───────▶ failed ──┐
///    └────────────────────────────────┘ (caller retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn can_transition_to(self, next: UploadStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
                | (Self::Failed, Self::Pending)
        )
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Metadata for an uploaded sequencing file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub id: UploadId,
    pub filename: String,
    pub file_path: String,
    pub file_size: Option<u64>,
    pub format: UploadFormat,
    pub status: UploadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Upload {
    /// Create a new `pending` upload.
    pub fn new(
        filename: impl Into<String>,
        file_path: impl Into<String>,
        file_size: Option<u64>,
        format: UploadFormat,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UploadId::new(),
            filename: filename.into(),
            file_path: file_path.into(),
            file_size,
            format,
            status: UploadStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_supported_extensions() {
        assert_eq!(UploadFormat::from_filename("reads.fastq"), Some(UploadFormat::Fastq));
        assert_eq!(UploadFormat::from_filename("reads.FQ"), Some(UploadFormat::Fastq));
        assert_eq!(UploadFormat::from_filename("ref.fasta"), Some(UploadFormat::Fasta));
        assert_eq!(UploadFormat::from_filename("ref.fa"), Some(UploadFormat::Fasta));
        assert_eq!(UploadFormat::from_filename("notes.txt"), None);
        assert_eq!(UploadFormat::from_filename("fastq"), None);
    }

    #[test]
    fn only_pending_can_be_claimed() {
        assert!(UploadStatus::Pending.can_transition_to(UploadStatus::Processing));
        assert!(!UploadStatus::Processing.can_transition_to(UploadStatus::Processing));
        assert!(!UploadStatus::Completed.can_transition_to(UploadStatus::Processing));
        assert!(!UploadStatus::Failed.can_transition_to(UploadStatus::Processing));
    }

    #[test]
    fn processing_releases_to_completed_or_failed() {
        assert!(UploadStatus::Processing.can_transition_to(UploadStatus::Completed));
        assert!(UploadStatus::Processing.can_transition_to(UploadStatus::Failed));
        assert!(!UploadStatus::Completed.can_transition_to(UploadStatus::Failed));
    }

    #[test]
    fn failed_can_be_reset_for_retry() {
        assert!(UploadStatus::Failed.can_transition_to(UploadStatus::Pending));
        assert!(!UploadStatus::Completed.can_transition_to(UploadStatus::Pending));
    }
}
