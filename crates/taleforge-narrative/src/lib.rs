//! Taleforge — Narrative Orchestration bounded context.
//!
//! Responsible for the story arc (phases), the accumulated lore, the contract
//! every narrator response must honour, and the prompts sent to the narrator,
//! the illustrator and the demystifier.

pub mod application;
pub mod config;
pub mod domain;
