//! Mock taxonomy classification against the reference table.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{ClassifierConfig, ConfigError, ReferenceCatalog};
use crate::error::Result;
use crate::types::{Asv, SpeciesLabel, TaxonAssignment};

/// Assign a taxon to every ASV.
///
/// Each ASV draws one reference entry. With `novelty_probability` the draw is
/// overridden: the species becomes unknown and confidence and identity come
/// from the lowered novel ranges. The drawn class is kept either way.
pub fn classify<R: Rng>(
    asvs: &[Asv],
    config: &ClassifierConfig,
    reference: &ReferenceCatalog,
    rng: &mut R,
) -> Result<Vec<TaxonAssignment>> {
    let mut taxa = Vec::with_capacity(asvs.len());
    for asv in asvs {
        let entry = reference
            .taxa
            .choose(rng)
            .ok_or(ConfigError::EmptyReference)?;
        let is_novel = rng.gen_bool(config.novelty_probability);
        let assignment = if is_novel {
            let confidence = config.novel_confidence.sample(rng);
            let pct_identity = config.novel_identity.sample(rng);
            TaxonAssignment::new(
                asv.id,
                SpeciesLabel::Unknown,
                entry.class.clone(),
                confidence,
                true,
                pct_identity,
            )?
        } else {
            let pct_identity = config.known_identity.sample(rng);
            TaxonAssignment::new(
                asv.id,
                SpeciesLabel::known(entry.species.clone()),
                entry.class.clone(),
                entry.confidence,
                false,
                pct_identity,
            )?
        };
        taxa.push(assignment);
    }
    Ok(taxa)
}
