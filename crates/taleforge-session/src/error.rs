//! Errors surfaced at the turn boundary.

use taleforge_core::error::DomainError;
use thiserror::Error;

use crate::domain::aggregates::AdventureStatus;

/// The one message a player sees when a turn fails.
pub const NARRATION_FAILED: &str =
    "The connection to the ethereal plane was lost. Please try again.";

/// Why a turn was not applied. The game state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    /// The adventure already ended; nothing more can happen.
    #[error("turn rejected: {0}")]
    TerminalState(AdventureStatus),

    /// Another turn of the same session has not finished yet.
    #[error("turn rejected: another turn is in flight")]
    InFlight,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl TurnError {
    /// Player-facing text. Field-level detail only goes to the logs.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        NARRATION_FAILED
    }

    /// Whether retrying the same or another action can succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::TerminalState(_) => false,
            Self::InFlight => true,
            Self::Domain(err) => !matches!(err, DomainError::Infrastructure(_)),
        }
    }
}
