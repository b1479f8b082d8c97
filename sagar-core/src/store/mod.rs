//! Storage traits for uploads, analysis results and alerts.
//!
//! - [`UploadStore`] - upload metadata and the status lock
//! - [`AnalysisStore`] - append-only results, committed together with their
//!   alerts and the upload's move to `completed`
//! - [`AlertStore`] - alert queries and reviewer status changes
//!
//! [`MemoryStore`] implements all three for tests and single-process use.

mod error;
mod memory;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::types::{
    Alert, AlertId, AlertStatus, AnalysisResult, Upload, UploadId, UploadStatus,
};

/// Upload metadata and status.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Register a new upload.
    async fn insert(&self, upload: Upload) -> Result<()>;

    /// Get an upload by ID.
    async fn get(&self, id: UploadId) -> Result<Option<Upload>>;

    /// Atomically move an upload from `expected` to `next`.
    ///
    /// Fails with [`StoreError::Conflict`] when the current status is not
    /// `expected`, and with [`StoreError::InvalidTransition`] when
    /// `expected → next` is not a legal status change. Returns the updated
    /// upload.
    async fn compare_and_set_status(
        &self,
        id: UploadId,
        expected: UploadStatus,
        next: UploadStatus,
    ) -> Result<Upload>;
}

/// A result and the alerts it raised, written as one unit. The owning upload
/// is `result.upload_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisCommit {
    pub result: AnalysisResult,
    pub alerts: Vec<Alert>,
}

/// Append-only analysis results.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Complete a claimed upload.
    ///
    /// In one atomic step: check the upload is `processing`, move it to
    /// `completed`, and write the result and its alerts. Fails with
    /// [`StoreError::NotFound`] for an unknown upload and
    /// [`StoreError::Conflict`] when it is no longer `processing`; on any
    /// failure nothing is written. Returns the completed upload.
    async fn commit(&self, commit: AnalysisCommit) -> Result<Upload>;

    /// All results recorded for an upload, oldest first.
    async fn results_for(&self, upload_id: UploadId) -> Result<Vec<AnalysisResult>>;
}

/// Filter for [`AlertStore::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub upload_id: Option<UploadId>,
    pub status: Option<AlertStatus>,
}

impl AlertFilter {
    pub fn for_upload(upload_id: UploadId) -> Self {
        Self {
            upload_id: Some(upload_id),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        self.upload_id.is_none_or(|id| alert.upload_id == id)
            && self.status.is_none_or(|status| alert.status == status)
    }
}

/// Alert queries and review transitions.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn get(&self, id: AlertId) -> Result<Option<Alert>>;

    /// Alerts matching `filter`, in creation order.
    async fn list(&self, filter: AlertFilter) -> Result<Vec<Alert>>;

    /// Change an alert's review status, enforcing
    /// [`AlertStatus::can_transition_to`].
    async fn set_status(&self, id: AlertId, next: AlertStatus) -> Result<Alert>;
}
