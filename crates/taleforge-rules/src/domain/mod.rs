//! Domain model for the Rules & Resolution context.

pub mod ability;
pub mod check;
pub mod commands;
