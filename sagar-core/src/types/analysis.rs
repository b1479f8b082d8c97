//! Analysis result records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AnalysisId, Asv, NoveltyScore, TaxonAssignment, UploadId};

/// Raw diversity indices for one run, kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiodiversityIndices {
    pub shannon: f64,
    pub simpson: f64,
    pub chao1: f64,
    pub richness: usize,
    pub evenness: f64,
}

impl BiodiversityIndices {
    /// Indices rounded to two decimals for reporting.
    pub fn report(&self) -> BiodiversityReport {
        BiodiversityReport {
            shannon: round2(self.shannon),
            simpson: round2(self.simpson),
            chao1: round2(self.chao1),
            richness: self.richness,
            evenness: round2(self.evenness),
        }
    }
}

/// Reported (two-decimal) diversity indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiodiversityReport {
    pub shannon: f64,
    pub simpson: f64,
    pub chao1: f64,
    pub richness: usize,
    pub evenness: f64,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reads and class breakdown for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbundanceSummary {
    pub total_reads: u64,
    pub unique_asvs: usize,
    pub class_distribution: Vec<ClassCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub name: String,
    pub count: usize,
}

/// Where an analysis came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub pipeline_version: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

impl Provenance {
    pub const PIPELINE_VERSION: &'static str = "1.0.0";
    pub const MODEL: &'static str = "DNABERT-mock";

    pub fn now() -> Self {
        Self {
            pipeline_version: Self::PIPELINE_VERSION.to_string(),
            model: Self::MODEL.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// The persisted outcome of one pipeline run. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: AnalysisId,
    pub upload_id: UploadId,
    pub asvs: Vec<Asv>,
    pub taxa: Vec<TaxonAssignment>,
    pub novelty_scores: Vec<NoveltyScore>,
    pub biodiversity_indices: BiodiversityReport,
    pub abundance: AbundanceSummary,
    pub summary: String,
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
}
