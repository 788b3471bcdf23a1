//! Seeded loss and duplication.

use serde::{Deserialize, Serialize};

use ra_core::SimRng;

/// Per-delivery fault rates.  Each receiver's copy is judged independently:
/// first dropped with `drop_rate`, otherwise queued and then queued a second
/// time with `duplicate_rate`.  Duplicates sit right behind the original, so
/// a sender's frames never overtake each other.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaultPolicy {
    pub drop_rate:      f64,
    pub duplicate_rate: f64,
    pub seed:           u64,
}

impl FaultPolicy {
    /// No loss, no duplication.
    pub fn reliable() -> Self {
        Self { drop_rate: 0.0, duplicate_rate: 0.0, seed: 0 }
    }

    pub fn lossy(drop_rate: f64, duplicate_rate: f64, seed: u64) -> Self {
        Self { drop_rate, duplicate_rate, seed }
    }

    pub fn is_reliable(&self) -> bool {
        self.drop_rate <= 0.0 && self.duplicate_rate <= 0.0
    }

    /// How many copies of one frame a receiver gets: 0, 1, or 2.
    pub(crate) fn copies(&self, rng: &mut SimRng) -> usize {
        if self.drop_rate > 0.0 && rng.gen_bool(self.drop_rate) {
            return 0;
        }
        if self.duplicate_rate > 0.0 && rng.gen_bool(self.duplicate_rate) {
            return 2;
        }
        1
    }
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self::reliable()
    }
}
