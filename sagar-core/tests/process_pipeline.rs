//! End-to-end processing tests against the in-memory store
//!
//! - repeated and concurrent processing of one upload
//! - failure and cancellation paths leave the upload `failed` with nothing committed
//! - completion happens inside the commit, never as a separate write
//! - retry after reset
//! - seeded runs are reproducible

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sagar_core::store::Result as StoreResult;
use sagar_core::{
    AlertFilter, AlertStore, AnalysisCommit, AnalysisResult, AnalysisStore, MemoryStore,
    Pipeline, PipelineConfig, PipelineError, Processor, SeededRngSource, StoreError, Upload,
    UploadFormat, UploadId, UploadStatus, UploadStore,
};

fn processor_for(
    uploads: Arc<dyn UploadStore>,
    analyses: Arc<dyn AnalysisStore>,
    seed: u64,
) -> Processor {
    Processor::new(
        Pipeline::new(PipelineConfig::default()).unwrap(),
        uploads,
        analyses,
        Arc::new(SeededRngSource::new(seed)),
    )
}

fn new_upload() -> Upload {
    Upload::new(
        "reef-transect-04.fastq",
        "uploads/reef-transect-04.fastq",
        Some(1_048_576),
        UploadFormat::Fastq,
    )
}

async fn status(store: &MemoryStore, id: UploadId) -> UploadStatus {
    UploadStore::get(store, id).await.unwrap().unwrap().status
}

/// Analysis store that waits before delegating each commit.
struct SlowCommitStore {
    inner: Arc<MemoryStore>,
    delay: Duration,
}

#[async_trait]
impl AnalysisStore for SlowCommitStore {
    async fn commit(&self, commit: AnalysisCommit) -> StoreResult<Upload> {
        tokio::time::sleep(self.delay).await;
        self.inner.commit(commit).await
    }

    async fn results_for(&self, upload_id: UploadId) -> StoreResult<Vec<AnalysisResult>> {
        self.inner.results_for(upload_id).await
    }
}

/// Upload store that refuses every status change to `completed`.
struct NoCompletionStore {
    inner: Arc<MemoryStore>,
}

#[async_trait]
impl UploadStore for NoCompletionStore {
    async fn insert(&self, upload: Upload) -> StoreResult<()> {
        self.inner.insert(upload).await
    }

    async fn get(&self, id: UploadId) -> StoreResult<Option<Upload>> {
        UploadStore::get(self.inner.as_ref(), id).await
    }

    async fn compare_and_set_status(
        &self,
        id: UploadId,
        expected: UploadStatus,
        next: UploadStatus,
    ) -> StoreResult<Upload> {
        if next == UploadStatus::Completed {
            return Err(StoreError::Unavailable("completion refused".to_string()));
        }
        self.inner.compare_and_set_status(id, expected, next).await
    }
}

#[tokio::test]
async fn second_process_call_is_rejected_without_new_alerts() {
    let store = Arc::new(MemoryStore::new());
    let upload = new_upload();
    let id = upload.id;
    store.insert(upload).await.unwrap();
    let processor = processor_for(store.clone(), store.clone(), 11);

    processor.process(id).await.unwrap();
    let alerts_after_first = store.alert_count().await;

    let err = processor.process(id).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidState {
            expected: UploadStatus::Pending,
            actual: UploadStatus::Completed,
        }
    ));
    assert!(err.leaves_status_unchanged());
    assert_eq!(store.alert_count().await, alerts_after_first);
    assert_eq!(store.results_for(id).await.unwrap().len(), 1);
    assert_eq!(status(&store, id).await, UploadStatus::Completed);
}

#[tokio::test]
async fn missing_upload_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let other = new_upload();
    let other_id = other.id;
    store.insert(other).await.unwrap();
    let processor = processor_for(store.clone(), store.clone(), 1);

    let err = processor.process(UploadId::new()).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
    assert_eq!(status(&store, other_id).await, UploadStatus::Pending);
    assert_eq!(store.result_count().await, 0);
}

#[tokio::test]
async fn failed_commit_then_retry_completes() {
    let store = Arc::new(MemoryStore::new());
    let upload = new_upload();
    let id = upload.id;
    store.insert(upload).await.unwrap();
    let processor = processor_for(store.clone(), store.clone(), 5);

    store.set_fail_commits(true);
    let err = processor.process(id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Persistence(_)));
    assert_eq!(status(&store, id).await, UploadStatus::Failed);
    assert!(store.results_for(id).await.unwrap().is_empty());
    assert!(
        store
            .list(AlertFilter::for_upload(id))
            .await
            .unwrap()
            .is_empty()
    );

    // A failed upload is not retried implicitly.
    let err = processor.process(id).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidState {
            actual: UploadStatus::Failed,
            ..
        }
    ));

    store.set_fail_commits(false);
    processor.reset_for_retry(id).await.unwrap();
    let outcome = processor.process(id).await.unwrap();

    assert_eq!(status(&store, id).await, UploadStatus::Completed);
    let alerts = store.list(AlertFilter::for_upload(id)).await.unwrap();
    assert_eq!(alerts.len(), outcome.alerts.len());
}

#[tokio::test]
async fn completion_is_written_by_the_commit() {
    let store = Arc::new(MemoryStore::new());
    let upload = new_upload();
    let id = upload.id;
    store.insert(upload).await.unwrap();
    let uploads = Arc::new(NoCompletionStore {
        inner: store.clone(),
    });
    let processor = processor_for(uploads, store.clone(), 13);

    let outcome = processor.process(id).await.unwrap();
    assert_eq!(status(&store, id).await, UploadStatus::Completed);
    assert_eq!(store.result_count().await, 1);
    assert_eq!(store.alert_count().await, outcome.alerts.len());
}

#[tokio::test]
async fn upload_failed_mid_run_keeps_nothing_and_retry_commits_once() {
    let store = Arc::new(MemoryStore::new());
    let upload = new_upload();
    let id = upload.id;
    store.insert(upload).await.unwrap();
    let slow = Arc::new(SlowCommitStore {
        inner: store.clone(),
        delay: Duration::from_millis(200),
    });
    let processor = Arc::new(processor_for(store.clone(), slow, 21));

    let running = {
        let processor = Arc::clone(&processor);
        tokio::spawn(async move { processor.process(id).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    processor.mark_failed(id).await.unwrap();

    let err = running.await.unwrap().unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Persistence(StoreError::Conflict { .. })
    ));
    assert_eq!(status(&store, id).await, UploadStatus::Failed);
    assert_eq!(store.result_count().await, 0);
    assert_eq!(store.alert_count().await, 0);

    processor.reset_for_retry(id).await.unwrap();
    let outcome = processor.process(id).await.unwrap();
    assert_eq!(status(&store, id).await, UploadStatus::Completed);
    assert_eq!(store.result_count().await, 1);
    assert_eq!(store.alert_count().await, outcome.alerts.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_processing_claims_once() {
    let store = Arc::new(MemoryStore::new());
    let upload = new_upload();
    let id = upload.id;
    store.insert(upload).await.unwrap();
    let processor = Arc::new(processor_for(store.clone(), store.clone(), 3));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let processor = Arc::clone(&processor);
            tokio::spawn(async move { processor.process(id).await })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(err) => assert!(
                matches!(err, PipelineError::InvalidState { .. }),
                "unexpected error: {err}"
            ),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(store.result_count().await, 1);
    assert_eq!(status(&store, id).await, UploadStatus::Completed);
}

#[tokio::test]
async fn interrupted_run_releases_upload_as_failed() {
    let store = Arc::new(MemoryStore::new());
    let upload = new_upload();
    let id = upload.id;
    store.insert(upload).await.unwrap();
    let slow = Arc::new(SlowCommitStore {
        inner: store.clone(),
        delay: Duration::from_millis(500),
    });
    let processor = processor_for(store.clone(), slow, 9);

    let timed_out = tokio::time::timeout(Duration::from_millis(20), processor.process(id)).await;
    assert!(timed_out.is_err());

    // The release runs on a spawned task.
    for _ in 0..50 {
        if status(&store, id).await == UploadStatus::Failed {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status(&store, id).await, UploadStatus::Failed);
    assert_eq!(store.result_count().await, 0);
}

#[tokio::test]
async fn same_seed_same_upload_reproduces_analysis() {
    let upload = new_upload();
    let id = upload.id;

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let store = Arc::new(MemoryStore::new());
        store.insert(upload.clone()).await.unwrap();
        let processor = processor_for(store.clone(), store, 2024);
        outcomes.push(processor.process(id).await.unwrap());
    }

    let (a, b) = (&outcomes[0], &outcomes[1]);
    assert_eq!(a.result.asvs, b.result.asvs);
    assert_eq!(a.result.taxa, b.result.taxa);
    assert_eq!(a.result.novelty_scores, b.result.novelty_scores);
    assert_eq!(a.result.biodiversity_indices, b.result.biodiversity_indices);
    assert_eq!(a.result.summary, b.result.summary);
    let titles = |o: &sagar_core::ProcessOutcome| {
        o.alerts.iter().map(|a| a.title.clone()).collect::<Vec<_>>()
    };
    assert_eq!(titles(a), titles(b));
}

#[tokio::test]
async fn committed_alerts_belong_to_upload_and_start_active() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_for(store.clone(), store.clone(), 77);

    let mut ids = Vec::new();
    for _ in 0..5 {
        let upload = new_upload();
        ids.push(upload.id);
        store.insert(upload).await.unwrap();
    }
    for id in &ids {
        processor.process(*id).await.unwrap();
    }

    for id in ids {
        for alert in store.list(AlertFilter::for_upload(id)).await.unwrap() {
            assert_eq!(alert.upload_id, id);
            assert_eq!(alert.status, sagar_core::AlertStatus::Active);
        }
    }
}
