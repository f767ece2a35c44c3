//! Domain model for the Character Management context.

pub mod character;
pub mod creation;
