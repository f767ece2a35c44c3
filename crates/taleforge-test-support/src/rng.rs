//! Deterministic `DeterministicRng` implementations for tests.

use taleforge_core::rng::DeterministicRng;

/// An RNG that returns values from a predetermined sequence, e.g. scripted d20
/// faces. Panics if the sequence is exhausted.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of values handed out so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = *self
            .values
            .get(self.index)
            .unwrap_or_else(|| panic!("SequenceRng exhausted after {} values", self.index));
        self.index += 1;
        val
    }
}
