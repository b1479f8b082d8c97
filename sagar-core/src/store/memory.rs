//! In-memory store implementation.
//!
//! One lock guards uploads, results and alerts together, so a commit and the
//! upload's move to `completed` are atomic with respect to every reader. Useful for tests and for running the
//! pipeline without an external database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{
    AlertFilter, AlertStore, AnalysisCommit, AnalysisStore, Result, StoreError, UploadStore,
};
use crate::types::{
    Alert, AlertId, AlertStatus, AnalysisResult, Upload, UploadId, UploadStatus,
};

#[derive(Default)]
struct State {
    uploads: HashMap<UploadId, Upload>,
    results: Vec<AnalysisResult>,
    alerts: Vec<Alert>,
}

/// In-memory implementation of every sagar store trait.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    fail_commits: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent [`AnalysisStore::commit`] fail without writing.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of stored alerts across all uploads.
    pub async fn alert_count(&self) -> usize {
        self.state.read().await.alerts.len()
    }

    /// Number of stored analysis results across all uploads.
    pub async fn result_count(&self) -> usize {
        self.state.read().await.results.len()
    }
}

#[async_trait]
impl UploadStore for MemoryStore {
    #[instrument(skip(self, upload), fields(upload_id = %upload.id), level = "debug")]
    async fn insert(&self, upload: Upload) -> Result<()> {
        let mut state = self.state.write().await;
        if state.uploads.contains_key(&upload.id) {
            return Err(StoreError::Duplicate(upload.id.to_string()));
        }
        state.uploads.insert(upload.id, upload);
        Ok(())
    }

    async fn get(&self, id: UploadId) -> Result<Option<Upload>> {
        Ok(self.state.read().await.uploads.get(&id).cloned())
    }

    #[instrument(skip(self), level = "debug")]
    async fn compare_and_set_status(
        &self,
        id: UploadId,
        expected: UploadStatus,
        next: UploadStatus,
    ) -> Result<Upload> {
        if !expected.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                from: expected.to_string(),
                to: next.to_string(),
            });
        }

        let mut state = self.state.write().await;
        let upload = state
            .uploads
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if upload.status != expected {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                expected: expected.to_string(),
                actual: upload.status.to_string(),
            });
        }
        upload.status = next;
        upload.updated_at = Utc::now();
        debug!(%id, from = %expected, to = %next, "upload status changed");
        Ok(upload.clone())
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    #[instrument(skip(self, commit), fields(upload_id = %commit.result.upload_id), level = "debug")]
    async fn commit(&self, commit: AnalysisCommit) -> Result<Upload> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit rejected".to_string()));
        }
        let id = commit.result.upload_id;
        let mut state = self.state.write().await;
        let upload = state
            .uploads
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if upload.status != UploadStatus::Processing {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                expected: UploadStatus::Processing.to_string(),
                actual: upload.status.to_string(),
            });
        }
        upload.status = UploadStatus::Completed;
        upload.updated_at = Utc::now();
        let completed = upload.clone();

        let alerts = commit.alerts.len();
        state.results.push(commit.result);
        state.alerts.extend(commit.alerts);
        debug!(alerts, "analysis committed, upload completed");
        Ok(completed)
    }

    async fn results_for(&self, upload_id: UploadId) -> Result<Vec<AnalysisResult>> {
        Ok(self
            .state
            .read()
            .await
            .results
            .iter()
            .filter(|r| r.upload_id == upload_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn get(&self, id: AlertId) -> Result<Option<Alert>> {
        Ok(self
            .state
            .read()
            .await
            .alerts
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list(&self, filter: AlertFilter) -> Result<Vec<Alert>> {
        Ok(self
            .state
            .read()
            .await
            .alerts
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn set_status(&self, id: AlertId, next: AlertStatus) -> Result<Alert> {
        let mut state = self.state.write().await;
        let alert = state
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !alert.status.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                from: alert.status.to_string(),
                to: next.to_string(),
            });
        }
        alert.status = next;
        alert.updated_at = Utc::now();
        Ok(alert.clone())
    }
}
