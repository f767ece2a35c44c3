//! Commands for the Session & Progress context.

use taleforge_narrative::domain::action::PlayerAction;
use taleforge_rules::domain::check::CheckOutcome;
use uuid::Uuid;

/// Command to play one turn.
#[derive(Debug, Clone)]
pub struct TakeTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub action: PlayerAction,
    /// Outcome of a check the caller already rolled for `action`.
    pub dice_result: Option<CheckOutcome>,
}

impl TakeTurn {
    /// A turn with a fresh correlation ID.
    #[must_use]
    pub fn new(action: PlayerAction, dice_result: Option<CheckOutcome>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            action,
            dice_result,
        }
    }
}
