//! Commands for the Rules & Resolution context.

use uuid::Uuid;

use super::check::DiceCheck;

/// Command to roll a check for a character.
#[derive(Debug, Clone)]
pub struct ResolveCheck {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The check to resolve.
    pub check: DiceCheck,
    /// The character's score in `check.stat`.
    pub score: i32,
}
