//! Command handlers for the Rules & Resolution context.

use std::sync::Mutex;

use taleforge_core::error::DomainError;
use taleforge_core::rng::DeterministicRng;
use tracing::info;

use crate::domain::check::{CheckResult, resolve_check};
use crate::domain::commands::ResolveCheck;

/// Handles the `ResolveCheck` command: rolls the d20 with the shared RNG and
/// returns the resolved result.
///
/// The `Mutex` is held only for the synchronous roll, so callers may invoke
/// this from async code without holding a guard across an await point.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the RNG mutex is poisoned.
pub fn handle_resolve_check(
    command: &ResolveCheck,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<CheckResult, DomainError> {
    let result = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        resolve_check(command.score, command.check.dc, &mut *rng_guard)
    };

    info!(
        correlation_id = %command.correlation_id,
        stat = %command.check.stat,
        dc = command.check.dc,
        roll = result.natural_roll,
        total = result.total,
        outcome = %result.outcome,
        "check resolved"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use taleforge_core::rng::DeterministicRng;
    use taleforge_test_support::SequenceRng;
    use uuid::Uuid;

    use crate::application::command_handlers::handle_resolve_check;
    use crate::domain::ability::Stat;
    use crate::domain::check::{CheckOutcome, DiceCheck};
    use crate::domain::commands::ResolveCheck;

    #[test]
    fn test_handle_resolve_check_uses_shared_rng() {
        // Arrange
        let rng: Mutex<SequenceRng> = Mutex::new(SequenceRng::new(vec![4, 17]));
        let rng_ref: &Mutex<dyn DeterministicRng + Send> = &rng;
        let command = ResolveCheck {
            correlation_id: Uuid::new_v4(),
            check: DiceCheck {
                stat: Stat::Strength,
                dc: 12,
            },
            score: 16,
        };

        // Act
        let first = handle_resolve_check(&command, rng_ref).unwrap();
        let second = handle_resolve_check(&command, rng_ref).unwrap();

        // Assert
        assert_eq!(first.natural_roll, 4);
        assert_eq!(first.total, 7);
        assert_eq!(first.outcome, CheckOutcome::Fail);
        assert_eq!(second.natural_roll, 17);
        assert_eq!(second.outcome, CheckOutcome::Success);
    }

    #[test]
    fn test_handle_resolve_check_reports_poisoned_rng() {
        let rng: Mutex<SequenceRng> = Mutex::new(SequenceRng::new(vec![]));
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = rng.lock().unwrap();
            panic!("poison the lock");
        }));
        let rng_ref: &Mutex<dyn DeterministicRng + Send> = &rng;
        let command = ResolveCheck {
            correlation_id: Uuid::new_v4(),
            check: DiceCheck {
                stat: Stat::Wisdom,
                dc: 10,
            },
            score: 10,
        };

        let result = handle_resolve_check(&command, rng_ref);

        assert!(result.is_err());
    }
}
