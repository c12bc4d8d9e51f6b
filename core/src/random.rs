//! Random number collaborators consumed by generation, navigation and spawning.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Draws an integer in `[low, high)`. An empty range returns `low`.
    fn next_int(&mut self, low: u32, high: u32) -> u32;
}

/// Deterministic production source backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a new source seeded with the provided value.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed the source was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

/// Replays a fixed sequence of values, cycling once exhausted.
///
/// Each draw yields `low + value % (high - low)`. An empty script always
/// yields `low`.
#[cfg(feature = "scripted_random")]
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: Vec<u32>,
    cursor: usize,
}

#[cfg(feature = "scripted_random")]
impl ScriptedRandom {
    /// Creates a source that replays `values` in order.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of scripted values consumed so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

#[cfg(feature = "scripted_random")]
impl RandomSource for ScriptedRandom {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let value = if self.values.is_empty() {
            0
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor = self.cursor.wrapping_add(1);
        low + value % (high - low)
    }
}
