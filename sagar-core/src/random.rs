//! Injectable random sources.
//!
//! Every random draw in the pipeline comes from a [`StdRng`] handed out by an
//! [`RngSource`]. Each upload gets its own generator, so concurrent runs for
//! different uploads share no mutable state.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::types::UploadId;

/// Hands out a random generator for one pipeline run.
pub trait RngSource: Send + Sync {
    fn rng_for(&self, upload: UploadId) -> StdRng;
}

/// Deterministic source: the same seed and upload id always yield the same stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRngSource {
    seed: u64,
}

impl SeededRngSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngSource for SeededRngSource {
    fn rng_for(&self, upload: UploadId) -> StdRng {
        let id = upload.as_u128();
        let folded = (id as u64) ^ ((id >> 64) as u64);
        StdRng::seed_from_u64(self.seed ^ folded)
    }
}

/// Non-reproducible source seeded from OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyRngSource;

impl RngSource for EntropyRngSource {
    fn rng_for(&self, _upload: UploadId) -> StdRng {
        StdRng::from_entropy()
    }
}
