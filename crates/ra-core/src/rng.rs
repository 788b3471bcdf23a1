//! Deterministic, seeded RNG wrapper.
//!
//! Randomness in the dispatch core is confined to test-and-demo concerns:
//! fault injection on the sync channel and generation of verification codes.
//! Both must be reproducible, so every draw goes through a `SimRng` seeded
//! from configuration.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG for channel faults and code generation.
///
/// Used only in single-threaded contexts; each process owns its own.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
