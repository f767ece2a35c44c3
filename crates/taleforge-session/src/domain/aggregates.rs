//! Aggregate roots for the Session & Progress context.

use std::fmt;

use serde::{Deserialize, Serialize};
use taleforge_character::domain::character::Character;
use taleforge_core::aggregate::AggregateRoot;
use taleforge_narrative::domain::phase::NarrativePhase;
use uuid::Uuid;

use super::events::{AdventureEvent, AdventureEventKind};

/// Where the adventure as a whole stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdventureStatus {
    Ongoing,
    /// Absorbing: no further turns are accepted.
    PlayerDead,
    /// Absorbing: no further turns are accepted.
    AdventureOver,
}

impl AdventureStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for AdventureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ongoing => "ongoing",
            Self::PlayerDead => "player dead",
            Self::AdventureOver => "adventure over",
        })
    }
}

/// The aggregate root for one adventure.
///
/// Turns never edit a live `GameState`; they fold their events into a copy
/// (see [`AggregateRoot::with_applied`]) that then replaces it whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub version: i64,
    pub character: Character,
    pub art_style: String,
    /// Narrated scenes, oldest first. Append-only.
    pub story_log: Vec<String>,
    pub phase: NarrativePhase,
    /// Lore fragments joined by `"; "`.
    pub lore: String,
    pub status: AdventureStatus,
}

impl GameState {
    /// A fresh adventure, ready for its opening scene.
    #[must_use]
    pub fn new(id: Uuid, character: Character, art_style: impl Into<String>) -> Self {
        Self {
            id,
            version: 0,
            character,
            art_style: art_style.into(),
            story_log: Vec::new(),
            phase: NarrativePhase::Hook,
            lore: String::new(),
            status: AdventureStatus::Ongoing,
        }
    }
}

impl AggregateRoot for GameState {
    type Event = AdventureEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            AdventureEventKind::SceneNarrated(narrated) => {
                self.story_log.push(narrated.scene_description.clone());
                self.phase = narrated.phase;
                self.lore.clone_from(&narrated.lore);
            }
            AdventureEventKind::PlayerDied(_) => self.status = AdventureStatus::PlayerDead,
            AdventureEventKind::AdventureConcluded(_) => {
                self.status = AdventureStatus::AdventureOver;
            }
        }
        self.version += 1;
    }
}
