use serde::{Deserialize, Serialize};

use super::{AsvId, ValidationError, check_range};

/// Novelty metrics for a novel or low-identity ASV. Every score is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoveltyScore {
    pub asv_id: AsvId,
    pub novelty_score: f64,
    pub cluster_cohesion: f64,
    pub reproducibility: f64,
}

impl NoveltyScore {
    pub fn new(
        asv_id: AsvId,
        novelty_score: f64,
        cluster_cohesion: f64,
        reproducibility: f64,
    ) -> Result<Self, ValidationError> {
        check_range("novelty_score", novelty_score, 0.0, 1.0)?;
        check_range("cluster_cohesion", cluster_cohesion, 0.0, 1.0)?;
        check_range("reproducibility", reproducibility, 0.0, 1.0)?;
        Ok(Self {
            asv_id,
            novelty_score,
            cluster_cohesion,
            reproducibility,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unit_interval_scores() {
        assert!(NoveltyScore::new(AsvId::from_index(1), 0.4, 0.5, 1.0).is_ok());
    }

    #[test]
    fn rejects_nan() {
        assert!(NoveltyScore::new(AsvId::from_index(1), f64::NAN, 0.5, 0.6).is_err());
    }
}
