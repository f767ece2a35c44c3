//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An inbound payload broke its structural contract.
    #[error("contract violation on `{field}`: {reason}")]
    Contract {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A call to an external service failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A local infrastructure failure (poisoned lock, bad config file, ...).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for building a [`DomainError::Contract`].
    pub fn contract(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Contract {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the message carried by the error without its category prefix.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(message) | Self::Transport(message) | Self::Infrastructure(message) => {
                message
            }
            Self::Contract { reason, .. } => reason,
        }
    }
}
