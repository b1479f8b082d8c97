//! Domain records for uploads, analyses and alerts.

mod alert;
mod analysis;
mod asv;
mod ids;
mod novelty;
mod taxon;
mod upload;

pub use alert::{Alert, AlertStatus, AlertType, Severity};
pub use analysis::{
    AbundanceSummary, AnalysisResult, BiodiversityIndices, BiodiversityReport, ClassCount,
    Provenance,
};
pub use asv::Asv;
pub use ids::{AlertId, AnalysisId, AsvId, UploadId};
pub use novelty::NoveltyScore;
pub use taxon::{SpeciesLabel, TaxonAssignment, UNKNOWN_SPECIES};
pub use upload::{Upload, UploadFormat, UploadStatus};

use thiserror::Error;

/// A record field outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("sequence contains invalid base {0:?}")]
    InvalidBase(char),

    #[error("sequence must not be empty")]
    EmptySequence,

    #[error("read count must be positive")]
    ZeroReads,

    #[error("novel assignment for {0} must carry the unknown species label")]
    NovelWithKnownSpecies(AsvId),

    #[error("invalid ASV id: {0}")]
    InvalidAsvId(String),
}

pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
