//! Upload processing: claim, analyze, commit, release.
//!
//! [`Processor::process`] is the only way an upload moves through
//! `pending → processing → completed | failed`. The `processing` status acts
//! as a lock taken by compare-and-set, so two concurrent calls for the same
//! upload cannot both run the pipeline.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::error::{PipelineError, Result};
use crate::pipeline::Pipeline;
use crate::random::RngSource;
use crate::store::{AnalysisCommit, AnalysisStore, StoreError, UploadStore};
use crate::types::{
    Alert, AnalysisResult, BiodiversityIndices, BiodiversityReport, Upload, UploadId,
    UploadStatus,
};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessOutcome {
    pub result: AnalysisResult,
    /// Unrounded indices; the persisted result carries the rounded report.
    pub indices: BiodiversityIndices,
    pub alerts: Vec<Alert>,
}

impl ProcessOutcome {
    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            asvs_count: self.result.asvs.len(),
            species_count: self.indices.richness,
            novel_candidates: self.result.novelty_scores.len(),
            alerts_generated: self.alerts.len(),
            biodiversity_indices: self.result.biodiversity_indices,
        }
    }
}

/// Counts reported back to the caller after a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub asvs_count: usize,
    pub species_count: usize,
    pub novel_candidates: usize,
    pub alerts_generated: usize,
    pub biodiversity_indices: BiodiversityReport,
}

/// Drives uploads through the pipeline against a pair of stores.
pub struct Processor {
    pipeline: Pipeline,
    uploads: Arc<dyn UploadStore>,
    analyses: Arc<dyn AnalysisStore>,
    rng: Arc<dyn RngSource>,
}

impl Processor {
    pub fn new(
        pipeline: Pipeline,
        uploads: Arc<dyn UploadStore>,
        analyses: Arc<dyn AnalysisStore>,
        rng: Arc<dyn RngSource>,
    ) -> Self {
        Self {
            pipeline,
            uploads,
            analyses,
            rng,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Process one `pending` upload.
    ///
    /// On success the result and its alerts are committed in the same store
    /// call that moves the upload to `completed`. Any failure after the claim
    /// leaves it `failed` with nothing committed, including an upload that
    /// was forced out of `processing` while the run was in flight.
    /// [`PipelineError::NotFound`] and [`PipelineError::InvalidState`] leave
    /// the upload untouched.
    #[instrument(skip(self))]
    pub async fn process(&self, upload_id: UploadId) -> Result<ProcessOutcome> {
        let mut claim = self.claim(upload_id).await?;

        let outcome = match self.run(upload_id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(%upload_id, error = %err, "processing failed");
                claim.fail().await;
                return Err(err);
            }
        };
        claim.completed();

        let summary = outcome.run_summary();
        info!(
            %upload_id,
            asvs = summary.asvs_count,
            species = summary.species_count,
            novel = summary.novel_candidates,
            alerts = summary.alerts_generated,
            "upload processed"
        );
        Ok(outcome)
    }

    /// Force a stuck `processing` upload to `failed`.
    #[instrument(skip(self))]
    pub async fn mark_failed(&self, upload_id: UploadId) -> Result<Upload> {
        self.transition(upload_id, UploadStatus::Processing, UploadStatus::Failed)
            .await
    }

    /// Move a `failed` upload back to `pending` so it can be processed again.
    #[instrument(skip(self))]
    pub async fn reset_for_retry(&self, upload_id: UploadId) -> Result<Upload> {
        self.transition(upload_id, UploadStatus::Failed, UploadStatus::Pending)
            .await
    }

    async fn claim(&self, upload_id: UploadId) -> Result<UploadClaim> {
        let upload = self
            .uploads
            .get(upload_id)
            .await?
            .ok_or(PipelineError::NotFound(upload_id))?;
        if upload.status != UploadStatus::Pending {
            return Err(PipelineError::InvalidState {
                expected: UploadStatus::Pending,
                actual: upload.status,
            });
        }

        self.transition(upload_id, UploadStatus::Pending, UploadStatus::Processing)
            .await?;
        Ok(UploadClaim {
            upload_id,
            uploads: Arc::clone(&self.uploads),
            held: true,
        })
    }

    async fn run(&self, upload_id: UploadId) -> Result<ProcessOutcome> {
        let analysis = {
            let mut rng = self.rng.rng_for(upload_id);
            self.pipeline.analyze(upload_id, &mut rng)?
        };
        let (result, indices, alerts) = analysis.into_parts();

        // Completes the upload as part of the same write.
        self.analyses
            .commit(AnalysisCommit {
                result: result.clone(),
                alerts: alerts.clone(),
            })
            .await?;

        Ok(ProcessOutcome {
            result,
            indices,
            alerts,
        })
    }

    /// Compare-and-set with store conflicts reported as upload-level errors.
    async fn transition(
        &self,
        upload_id: UploadId,
        expected: UploadStatus,
        next: UploadStatus,
    ) -> Result<Upload> {
        match self
            .uploads
            .compare_and_set_status(upload_id, expected, next)
            .await
        {
            Ok(upload) => Ok(upload),
            Err(StoreError::NotFound(_)) => Err(PipelineError::NotFound(upload_id)),
            Err(StoreError::Conflict { .. }) => {
                let actual = self
                    .uploads
                    .get(upload_id)
                    .await?
                    .ok_or(PipelineError::NotFound(upload_id))?
                    .status;
                Err(PipelineError::InvalidState { expected, actual })
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// An upload held in `processing` by this process.
///
/// Dropping a claim that was never released schedules a
/// `processing → failed` transition on the current tokio runtime, so a
/// cancelled or timed-out run does not leave the upload locked.
struct UploadClaim {
    upload_id: UploadId,
    uploads: Arc<dyn UploadStore>,
    held: bool,
}

impl UploadClaim {
    /// The commit already moved the upload to `completed`.
    fn completed(&mut self) {
        self.held = false;
    }

    async fn fail(&mut self) {
        let upload_id = self.upload_id;
        match self
            .uploads
            .compare_and_set_status(upload_id, UploadStatus::Processing, UploadStatus::Failed)
            .await
        {
            Ok(_) => self.held = false,
            Err(StoreError::Conflict { actual, .. }) => {
                self.held = false;
                warn!(%upload_id, %actual, "upload already left processing");
            }
            Err(err) => {
                error!(%upload_id, error = %err, "could not mark upload failed");
            }
        }
    }
}

impl Drop for UploadClaim {
    fn drop(&mut self) {
        if !self.held {
            return;
        }
        let upload_id = self.upload_id;
        let uploads = Arc::clone(&self.uploads);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(%upload_id, "processing interrupted, releasing upload as failed");
                handle.spawn(async move {
                    if let Err(err) = uploads
                        .compare_and_set_status(
                            upload_id,
                            UploadStatus::Processing,
                            UploadStatus::Failed,
                        )
                        .await
                    {
                        error!(%upload_id, error = %err, "could not release interrupted upload");
                    }
                });
            }
            Err(_) => {
                error!(%upload_id, "no runtime to release interrupted upload; it stays processing");
            }
        }
    }
}
