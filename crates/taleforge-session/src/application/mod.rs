//! Application layer for the Session & Progress context.

pub mod creation;
pub mod demystify;
pub mod illustration;
pub mod narration_audio;
pub mod orchestrator;
pub mod session;
