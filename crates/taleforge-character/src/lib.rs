//! Taleforge — Character Management bounded context.
//!
//! Responsible for the options offered at character creation, turning a
//! player's draft into an immutable character, and describing that character
//! to the narrator and the illustrator.

pub mod domain;
