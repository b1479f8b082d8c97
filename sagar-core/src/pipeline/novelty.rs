//! Novelty scoring for novel and low-identity ASVs.

use rand::Rng;

use crate::config::AnalyzerConfig;
use crate::types::{NoveltyScore, TaxonAssignment, ValidationError};

/// Whether an assignment is a novelty candidate.
pub fn needs_novelty_score(taxon: &TaxonAssignment, config: &AnalyzerConfig) -> bool {
    taxon.is_novel || taxon.pct_identity < config.low_identity_threshold
}

/// Score every novelty candidate, in assignment order.
///
/// `novelty_score = 1 - pct_identity / 100`; cohesion and reproducibility come
/// from their configured ranges.
pub fn score_novelty<R: Rng>(
    taxa: &[TaxonAssignment],
    config: &AnalyzerConfig,
    rng: &mut R,
) -> Result<Vec<NoveltyScore>, ValidationError> {
    taxa.iter()
        .filter(|taxon| needs_novelty_score(taxon, config))
        .map(|taxon| {
            let novelty = 1.0 - taxon.pct_identity / 100.0;
            let cohesion = config.cluster_cohesion.sample(rng);
            let reproducibility = config.reproducibility.sample(rng);
            NoveltyScore::new(taxon.asv_id, novelty, cohesion, reproducibility)
        })
        .collect()
}
