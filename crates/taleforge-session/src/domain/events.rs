//! Domain events for the Session & Progress context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taleforge_core::event::{DomainEvent, EventMetadata};
use taleforge_narrative::domain::phase::NarrativePhase;
use uuid::Uuid;

/// Emitted when a scene is added to the story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneNarrated {
    pub scene_description: String,
    /// Phase after this scene.
    pub phase: NarrativePhase,
    /// Lore after merging this scene's updates.
    pub lore: String,
}

/// Emitted when the narrator kills the player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDied {
    /// Phase the story was in.
    pub phase: NarrativePhase,
}

/// Emitted when the climax resolves and the story is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureConcluded {
    /// Phase after the concluding scene.
    pub phase: NarrativePhase,
}

/// Event type identifier for [`SceneNarrated`].
pub const SCENE_NARRATED_EVENT_TYPE: &str = "adventure.scene_narrated";

/// Event type identifier for [`PlayerDied`].
pub const PLAYER_DIED_EVENT_TYPE: &str = "adventure.player_died";

/// Event type identifier for [`AdventureConcluded`].
pub const ADVENTURE_CONCLUDED_EVENT_TYPE: &str = "adventure.adventure_concluded";

/// Event payload variants for the Session & Progress context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdventureEventKind {
    SceneNarrated(SceneNarrated),
    PlayerDied(PlayerDied),
    AdventureConcluded(AdventureConcluded),
}

impl AdventureEventKind {
    fn event_type(&self) -> &'static str {
        match self {
            Self::SceneNarrated(_) => SCENE_NARRATED_EVENT_TYPE,
            Self::PlayerDied(_) => PLAYER_DIED_EVENT_TYPE,
            Self::AdventureConcluded(_) => ADVENTURE_CONCLUDED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Session & Progress context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdventureEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: AdventureEventKind,
}

impl AdventureEvent {
    /// Wraps `kind` with fresh metadata.
    #[must_use]
    pub fn new(
        session_id: Uuid,
        sequence_number: i64,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
        kind: AdventureEventKind,
    ) -> Self {
        Self {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: session_id,
                sequence_number,
                correlation_id,
                occurred_at,
            },
            kind,
        }
    }
}

impl DomainEvent for AdventureEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // The payloads are plain derived structs; serialization cannot fail.
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_envelope_carries_type_and_payload() {
        // Arrange
        let session_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        // Act
        let event = AdventureEvent::new(
            session_id,
            3,
            correlation_id,
            at,
            AdventureEventKind::PlayerDied(PlayerDied {
                phase: NarrativePhase::Conflict,
            }),
        );

        // Assert
        assert_eq!(event.event_type(), PLAYER_DIED_EVENT_TYPE);
        assert_eq!(event.metadata().event_type, PLAYER_DIED_EVENT_TYPE);
        assert_eq!(event.metadata().aggregate_id, session_id);
        assert_eq!(event.metadata().sequence_number, 3);
        assert_eq!(event.metadata().correlation_id, correlation_id);
        assert_eq!(
            event.to_payload(),
            serde_json::json!({ "PlayerDied": { "phase": "CONFLICT" } })
        );
    }
}
