//! Taleforge — Session & Progress bounded context.
//!
//! Owns the game state of one adventure and the turn loop that advances it:
//! narration requests, automatic skill checks, state transitions, and the
//! illustration and narration-audio follow-ups of each scene.

pub mod application;
pub mod domain;
pub mod error;
