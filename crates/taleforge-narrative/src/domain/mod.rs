//! Domain model for the Narrative Orchestration context.

pub mod action;
pub mod lore;
pub mod metadata;
pub mod phase;
pub mod response;
