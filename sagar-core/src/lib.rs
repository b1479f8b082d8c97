//! Core library for sagar.
//!
//! sagar turns an uploaded eDNA sequencing file into an analysis record and a
//! set of conservation alerts. The sequencing stages are simulated: ASVs and
//! taxonomy are drawn from an injected random source, so a seeded run is fully
//! reproducible.
//!
//! # Architecture
//!
//! ```text
//! upload_id ──▶ Processor ──claim pending→processing──▶ UploadStore
//!                  │
//!                  ▼
//!   generator ─▶ classifier ─▶ analyzer ─▶ alerts      (pure, seeded)
//!                  │
//!                  ▼
//!            AnalysisStore::commit (result + alerts, atomic)
//!                  │
//!                  ▼
//!        release processing→completed | failed
//! ```
//!
//! Alert review (`active → validated | rejected`) is a separate operation in
//! [`review`].

mod error;

pub mod config;
pub mod pipeline;
pub mod processor;
pub mod random;
pub mod review;
pub mod store;
pub mod types;

pub use config::{
    AlertConfig, AnalyzerConfig, ClassifierConfig, ConfigError, GeneratorConfig, PipelineConfig,
    ReferenceCatalog, ReferenceTaxon, UnknownSpeciesPolicy, ValueRange,
};
pub use error::{PipelineError, Result};
pub use pipeline::{Analysis, Pipeline};
pub use processor::{ProcessOutcome, Processor, RunSummary};
pub use random::{EntropyRngSource, RngSource, SeededRngSource};
pub use review::AlertReview;
pub use store::{
    AlertFilter, AlertStore, AnalysisCommit, AnalysisStore, MemoryStore, StoreError, UploadStore,
};
pub use types::{
    AbundanceSummary, Alert, AlertId, AlertStatus, AlertType, AnalysisId, AnalysisResult, Asv,
    AsvId, BiodiversityIndices, BiodiversityReport, ClassCount, NoveltyScore, Provenance,
    Severity, SpeciesLabel, TaxonAssignment, UNKNOWN_SPECIES, Upload, UploadFormat, UploadId,
    UploadStatus, ValidationError,
};
