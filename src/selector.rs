//! # Selector
//!
//! Random index selection over an inventory.
//!
//! The first note of a session is drawn uniformly from the whole inventory. Every
//! later note is drawn uniformly from all indices except the current one, without a
//! retry loop: draw `r` from `[0, size - 1)` and shift it past the excluded index.
//!
//! ```text
//! size = 4, current = 1
//!
//! r:       0   1   2
//!          |    \   \
//! index:   0   1   2   3
//!              ^ never chosen
//! ```

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::{DrillError, Result};

/// Map a draw from `[0, size - 1)` onto `[0, size)` with `current` left out
pub fn exclusion_map(current: usize, r: usize) -> usize {
    if r >= current {
        r + 1
    } else {
        r
    }
}

/// Picks note indices using an owned random number generator
#[derive(Debug, Clone)]
pub struct Selector<R = Pcg32> {
    rng: R,
}

impl Selector<Pcg32> {
    /// Deterministic selector, for reproducible drills and tests
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(Pcg32::from_entropy())
    }
}

impl<R: Rng> Selector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform index in `[0, size)`
    pub fn initial(&mut self, size: usize) -> Result<usize> {
        if size == 0 {
            return Err(DrillError::EmptyInventory);
        }
        Ok(self.rng.gen_range(0..size))
    }

    /// Uniform index in `[0, size)` other than `current`
    pub fn next(&mut self, current: usize, size: usize) -> Result<usize> {
        if size < 2 {
            return Err(DrillError::SingletonInventory { size });
        }
        if current >= size {
            return Err(DrillError::IndexOutOfRange {
                index: current,
                size,
            });
        }
        let r = self.rng.gen_range(0..size - 1);
        Ok(exclusion_map(current, r))
    }
}
