//! Shared test doubles for the Taleforge narrative engine.

mod clock;
mod generator;
mod media;
mod rng;

pub use clock::{FixedClock, InstantPacer, RecordingPacer};
pub use generator::{FailingGenerator, ScriptedGenerator};
pub use media::{FailingSynthesizer, FailingVisualizer, RecordingVisualizer, ScriptedSynthesizer};
pub use rng::SequenceRng;
