//! Biodiversity indices.
//!
//! All indices are computed from the multiset of species buckets across the
//! taxon assignments of one run:
//!
//! - Shannon `H = -Σ pᵢ ln pᵢ`
//! - Simpson `D = 1 - Σ pᵢ²`
//! - richness `S` = number of distinct buckets
//! - Chao1 proxy `S + k(k-1)/2`, with `k` the number of novelty candidates
//! - evenness `H / ln S`, or `0` when `S ≤ 1`
//!
//! Chao1 here is a placeholder estimator; the singleton/doubleton counts the
//! real statistic needs are not available from a simulated run.

use std::collections::BTreeMap;

use crate::config::UnknownSpeciesPolicy;
use crate::types::{AsvId, BiodiversityIndices, TaxonAssignment};

/// One species bucket. Unknown buckets never compare equal to a named
/// species, whatever that species is called.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpeciesBucket {
    Known(String),
    Unknown,
    UnknownAsv(AsvId),
}

/// Count assignments per species bucket.
///
/// Under [`UnknownSpeciesPolicy::Singleton`] every unknown ASV gets its own
/// bucket keyed by its ASV id.
pub fn species_counts(
    taxa: &[TaxonAssignment],
    policy: UnknownSpeciesPolicy,
) -> BTreeMap<SpeciesBucket, usize> {
    let mut counts = BTreeMap::new();
    for taxon in taxa {
        let key = match (taxon.species.name(), policy) {
            (Some(name), _) => SpeciesBucket::Known(name.to_string()),
            (None, UnknownSpeciesPolicy::Pooled) => SpeciesBucket::Unknown,
            (None, UnknownSpeciesPolicy::Singleton) => SpeciesBucket::UnknownAsv(taxon.asv_id),
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Compute raw (unrounded) indices.
pub fn biodiversity(
    taxa: &[TaxonAssignment],
    novelty_candidates: usize,
    policy: UnknownSpeciesPolicy,
) -> BiodiversityIndices {
    let counts = species_counts(taxa, policy);
    let richness = counts.len();
    let total: usize = counts.values().sum();

    let (shannon, simpson) = if total == 0 {
        (0.0, 0.0)
    } else {
        let total = total as f64;
        let mut entropy = 0.0;
        let mut dominance = 0.0;
        for &count in counts.values() {
            let p = count as f64 / total;
            entropy -= p * p.ln();
            dominance += p * p;
        }
        (entropy.max(0.0), 1.0 - dominance)
    };

    let k = novelty_candidates as f64;
    let chao1 = richness as f64 + k * (k - 1.0).max(0.0) / 2.0;

    let evenness = if richness <= 1 {
        0.0
    } else {
        (shannon / (richness as f64).ln()).clamp(0.0, 1.0)
    };

    BiodiversityIndices {
        shannon,
        simpson,
        chao1,
        richness,
        evenness,
    }
}
