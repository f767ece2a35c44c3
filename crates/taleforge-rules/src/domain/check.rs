//! Skill checks: what the narrator asks for and how a roll resolves it.

use std::fmt;

use serde::{Deserialize, Serialize};
use taleforge_core::rng::DeterministicRng;

use super::ability::{Stat, ability_modifier};

/// A check the narrator attaches to an option or demands before narrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceCheck {
    /// The ability being tested.
    pub stat: Stat,
    /// Difficulty class the total must meet or exceed.
    pub dc: i32,
}

/// Pass/fail result of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    /// Total met or exceeded the DC.
    Success,
    /// Total fell short of the DC.
    Fail,
}

impl CheckOutcome {
    /// Lowercase wire form, also used in prompts.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CheckOutcome::Success => "success",
            CheckOutcome::Fail => "fail",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full record of one resolved check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The d20 face, in `1..=20`.
    pub natural_roll: u32,
    /// Ability modifier added to the roll.
    pub modifier: i32,
    /// `natural_roll + modifier`.
    pub total: i32,
    /// The DC the total was compared against.
    pub difficulty_class: i32,
    /// Resulting outcome.
    pub outcome: CheckOutcome,
}

/// Success iff `total >= difficulty_class`. Natural 1s and 20s are not special.
#[must_use]
pub fn determine_outcome(total: i32, difficulty_class: i32) -> CheckOutcome {
    if total >= difficulty_class {
        CheckOutcome::Success
    } else {
        CheckOutcome::Fail
    }
}

/// Rolls one d20 for an ability `score` against `difficulty_class`.
///
/// Consumes exactly one value from `rng`.
#[allow(clippy::cast_possible_wrap)]
pub fn resolve_check(
    score: i32,
    difficulty_class: i32,
    rng: &mut dyn DeterministicRng,
) -> CheckResult {
    let natural_roll = rng.next_u32_range(1, 20);
    let modifier = ability_modifier(score);
    let total = natural_roll as i32 + modifier;

    CheckResult {
        natural_roll,
        modifier,
        total,
        difficulty_class,
        outcome: determine_outcome(total, difficulty_class),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleforge_test_support::SequenceRng;

    #[test]
    fn test_outcome_is_success_iff_total_meets_dc_for_every_roll() {
        for score in [3, 8, 10, 13, 18] {
            for dc in [5, 10, 15, 20, 25] {
                for roll in 1..=20 {
                    let mut rng = SequenceRng::new(vec![roll]);
                    let result = resolve_check(score, dc, &mut rng);

                    let modifier = ability_modifier(score);
                    assert_eq!(result.natural_roll, roll);
                    assert_eq!(result.modifier, modifier);
                    assert_eq!(result.total, roll as i32 + modifier);
                    let expected = if roll as i32 + modifier >= dc {
                        CheckOutcome::Success
                    } else {
                        CheckOutcome::Fail
                    };
                    assert_eq!(result.outcome, expected, "score {score} dc {dc} roll {roll}");
                }
            }
        }
    }

    #[test]
    fn test_exact_dc_succeeds() {
        // DEX 14 (+2), roll 13 => 15 vs DC 15
        let mut rng = SequenceRng::new(vec![13]);
        let result = resolve_check(14, 15, &mut rng);
        assert_eq!(result.total, 15);
        assert_eq!(result.outcome, CheckOutcome::Success);
    }

    #[test]
    fn test_one_below_dc_fails() {
        let mut rng = SequenceRng::new(vec![12]);
        let result = resolve_check(14, 15, &mut rng);
        assert_eq!(result.outcome, CheckOutcome::Fail);
    }

    #[test]
    fn test_natural_twenty_can_still_fail() {
        let mut rng = SequenceRng::new(vec![20]);
        let result = resolve_check(3, 25, &mut rng);
        assert_eq!(result.total, 16);
        assert_eq!(result.outcome, CheckOutcome::Fail);
    }

    #[test]
    fn test_outcome_wire_form() {
        assert_eq!(serde_json::to_value(CheckOutcome::Fail).unwrap(), "fail");
        assert_eq!(CheckOutcome::Success.to_string(), "success");
    }

    #[test]
    fn test_dice_check_deserializes_from_wire() {
        let check: DiceCheck = serde_json::from_value(serde_json::json!({
            "stat": "DEX",
            "dc": 15
        }))
        .unwrap();
        assert_eq!(
            check,
            DiceCheck {
                stat: Stat::Dexterity,
                dc: 15
            }
        );
    }
}
