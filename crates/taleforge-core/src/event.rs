//! Journal entries recorded for every applied turn.
//!
//! A turn is folded into the game state as a short list of events. The same
//! list is appended to the session journal, so replaying a journal from a
//! fresh state reproduces the live one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope fields shared by every journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    /// Dotted name such as `adventure.scene_narrated`.
    pub event_type: String,
    /// The session whose state the event changes.
    pub aggregate_id: Uuid,
    /// Position in the session journal. The first event of a turn follows
    /// the state's version, so a turn's events are contiguous.
    pub sequence_number: i64,
    /// Shared by all events of one turn, including any check rolled for it.
    pub correlation_id: Uuid,
    /// Taken from the injected clock when the turn was applied.
    pub occurred_at: DateTime<Utc>,
}

/// An entry in a session journal.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// The dotted name, matching [`EventMetadata::event_type`].
    fn event_type(&self) -> &'static str;

    /// The event body without its envelope, externally tagged by variant.
    ///
    /// A narrated scene journals as
    /// `{"SceneNarrated": {"scene_description": .., "phase": "HOOK", "lore": ..}}`
    /// and a death as `{"PlayerDied": {"phase": "CONFLICT"}}`.
    fn to_payload(&self) -> serde_json::Value;

    fn metadata(&self) -> &EventMetadata;
}
