//! What the player asked to do this turn.

use serde::{Deserialize, Serialize};

/// Action identifier that opens the adventure.
pub const START_GAME: &str = "start_game";

/// Action identifier reported for free-text actions.
pub const CUSTOM_ACTION: &str = "custom_action";

/// A player's request for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerAction {
    /// One of the options the narrator presented, by identifier.
    Scripted { action_id: String },
    /// Anything the player typed themselves.
    Custom { text: String },
}

impl PlayerAction {
    #[must_use]
    pub fn scripted(action_id: impl Into<String>) -> Self {
        Self::Scripted {
            action_id: action_id.into(),
        }
    }

    #[must_use]
    pub fn custom(text: impl Into<String>) -> Self {
        Self::Custom { text: text.into() }
    }

    /// The action that opens a new adventure.
    #[must_use]
    pub fn start_game() -> Self {
        Self::scripted(START_GAME)
    }

    /// Identifier of the action; free-text actions report [`CUSTOM_ACTION`].
    #[must_use]
    pub fn action_id(&self) -> &str {
        match self {
            Self::Scripted { action_id } => action_id,
            Self::Custom { .. } => CUSTOM_ACTION,
        }
    }

    #[must_use]
    pub fn is_start_game(&self) -> bool {
        matches!(self, Self::Scripted { action_id } if action_id == START_GAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_id_of_custom_action() {
        assert_eq!(PlayerAction::custom("dance").action_id(), CUSTOM_ACTION);
        assert_eq!(PlayerAction::scripted("open_door").action_id(), "open_door");
    }

    #[test]
    fn test_start_game_is_recognised() {
        assert!(PlayerAction::start_game().is_start_game());
        assert!(!PlayerAction::custom(START_GAME).is_start_game());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(PlayerAction::scripted("flee")).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "scripted", "action_id": "flee" }));
    }
}
