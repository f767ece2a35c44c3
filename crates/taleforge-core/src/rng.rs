//! Random number generator abstraction for determinism.
//!
//! Production code uses [`SeededRng`]. Tests inject a scripted
//! implementation so dice rolls are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// `StdRng`-backed generator, seeded from the OS or from a fixed seed.
#[derive(Debug)]
pub struct SeededRng(StdRng);

impl SeededRng {
    /// Seeds the generator from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeds the generator from a fixed value; equal seeds replay equal rolls.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for SeededRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}
