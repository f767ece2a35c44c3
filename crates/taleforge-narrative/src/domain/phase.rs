//! The fixed narrative arc and its progression.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One stage of the story arc. Ordered; a session never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NarrativePhase {
    CharacterCreation,
    Hook,
    Conflict,
    Resolution,
    Epilogue,
}

impl NarrativePhase {
    /// Every phase, in story order.
    pub const ALL: [NarrativePhase; 5] = [
        NarrativePhase::CharacterCreation,
        NarrativePhase::Hook,
        NarrativePhase::Conflict,
        NarrativePhase::Resolution,
        NarrativePhase::Epilogue,
    ];

    /// Wire and prompt form, e.g. `RESOLUTION`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NarrativePhase::CharacterCreation => "CHARACTER_CREATION",
            NarrativePhase::Hook => "HOOK",
            NarrativePhase::Conflict => "CONFLICT",
            NarrativePhase::Resolution => "RESOLUTION",
            NarrativePhase::Epilogue => "EPILOGUE",
        }
    }

    /// The following phase, or `None` for the last one.
    #[must_use]
    pub fn next(self) -> Option<NarrativePhase> {
        let index = NarrativePhase::ALL.iter().position(|&p| p == self)?;
        NarrativePhase::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for NarrativePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of folding a turn's completion flag into the arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAdvance {
    /// Phase after the turn.
    pub next: NarrativePhase,
    /// Whether the story is conclusively finished.
    pub story_ended: bool,
}

/// Advances the arc when the current phase is `complete`.
///
/// Completing `RESOLUTION` ends the story even though `EPILOGUE` still
/// follows: the climax is the dramatic end, the epilogue is narrated after it.
/// Completing the last phase stays put.
#[must_use]
pub fn advance(current: NarrativePhase, complete: bool) -> PhaseAdvance {
    if !complete {
        return PhaseAdvance {
            next: current,
            story_ended: false,
        };
    }

    PhaseAdvance {
        next: current.next().unwrap_or(current),
        story_ended: current == NarrativePhase::Resolution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_phase_never_moves() {
        for phase in NarrativePhase::ALL {
            assert_eq!(
                advance(phase, false),
                PhaseAdvance {
                    next: phase,
                    story_ended: false
                }
            );
        }
    }

    #[test]
    fn test_character_creation_completes_into_hook() {
        let result = advance(NarrativePhase::CharacterCreation, true);
        assert_eq!(result.next, NarrativePhase::Hook);
        assert!(!result.story_ended);
    }

    #[test]
    fn test_completing_resolution_ends_story_and_enters_epilogue() {
        let result = advance(NarrativePhase::Resolution, true);
        assert_eq!(result.next, NarrativePhase::Epilogue);
        assert!(result.story_ended);
    }

    #[test]
    fn test_completing_epilogue_stays_in_epilogue() {
        let result = advance(NarrativePhase::Epilogue, true);
        assert_eq!(result.next, NarrativePhase::Epilogue);
        assert!(!result.story_ended);
    }

    #[test]
    fn test_advance_never_regresses() {
        for phase in NarrativePhase::ALL {
            for complete in [false, true] {
                assert!(advance(phase, complete).next >= phase);
            }
        }
    }

    #[test]
    fn test_wire_form_round_trips_through_serde() {
        let json = serde_json::to_value(NarrativePhase::CharacterCreation).unwrap();
        assert_eq!(json, "CHARACTER_CREATION");
        let phase: NarrativePhase = serde_json::from_value(json).unwrap();
        assert_eq!(phase, NarrativePhase::CharacterCreation);
    }
}
