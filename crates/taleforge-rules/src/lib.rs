//! Taleforge — Rules & Resolution bounded context.
//!
//! Responsible for ability scores and for resolving the d20 checks the
//! narrator asks for.

pub mod application;
pub mod domain;
