//! Session random number generator.
//!
//! When `Tunables::seed` is set the same seed replays the same drops and spawn
//! positions. Without a seed the generator is seeded from the OS.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Resource)]
pub struct SimRng {
    rng: StdRng,
    seed: Option<u64>,
}

impl SimRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            seed: None,
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os_rng, Self::from_seed)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// One independent probability check. A zero chance never draws.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        p > 0.0 && self.unit() < p
    }

    /// Uniform draw in `[lo, hi]`; collapses to `lo` for an empty span.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_os_rng()
    }
}
