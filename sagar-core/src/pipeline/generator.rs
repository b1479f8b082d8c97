//! Synthetic ASV generation.

use rand::Rng;

use crate::config::GeneratorConfig;
use crate::types::{Asv, AsvId, ValidationError};

/// Generate the ASV set for one upload.
///
/// The count, every base and every read count come from `rng`.
pub fn generate_asvs<R: Rng>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<Asv>, ValidationError> {
    let count = config.asv_count.sample(rng);
    (1..=count)
        .map(|index| {
            let sequence = random_sequence(config.sequence_length, rng);
            let reads = config.reads.sample(rng);
            Asv::new(AsvId::from_index(index), sequence, reads)
        })
        .collect()
}

fn random_sequence<R: Rng>(length: u32, rng: &mut R) -> String {
    (0..length)
        .map(|_| Asv::ALPHABET[rng.gen_range(0..Asv::ALPHABET.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueRange;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn count_and_reads_stay_in_configured_bounds() {
        let config = GeneratorConfig::default();
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let asvs = generate_asvs(&config, &mut rng).unwrap();
            assert!(config.asv_count.contains(asvs.len() as u32));
            for asv in &asvs {
                assert!(config.reads.contains(asv.reads));
                assert_eq!(asv.length, 250);
                assert_eq!(asv.sequence.len(), 250);
            }
        }
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let config = GeneratorConfig {
            asv_count: ValueRange::new(20, 21),
            ..GeneratorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let asvs = generate_asvs(&config, &mut rng).unwrap();
        assert_eq!(asvs.len(), 20);
        assert_eq!(asvs[0].id.to_string(), "ASV_0001");
        assert_eq!(asvs[19].id.to_string(), "ASV_0020");
    }

    #[test]
    fn same_seed_reproduces_the_same_asvs() {
        let config = GeneratorConfig::default();
        let first = generate_asvs(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let second = generate_asvs(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn sequences_use_only_nucleotides() {
        let config = GeneratorConfig {
            sequence_length: 40,
            ..GeneratorConfig::default()
        };
        let asvs = generate_asvs(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert!(
            asvs.iter()
                .flat_map(|a| a.sequence.chars())
                .all(|c| Asv::ALPHABET.contains(&c))
        );
    }
}
