//! Ability scores and the six named stats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taleforge_core::error::DomainError;

/// One of the six character abilities. Serialized as its abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "WIS")]
    Wisdom,
    #[serde(rename = "CHA")]
    Charisma,
}

impl Stat {
    /// All stats in character-sheet order.
    pub const ALL: [Stat; 6] = [
        Stat::Strength,
        Stat::Dexterity,
        Stat::Constitution,
        Stat::Intelligence,
        Stat::Wisdom,
        Stat::Charisma,
    ];

    /// The three-letter abbreviation used on the wire and in prompts.
    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        match self {
            Stat::Strength => "STR",
            Stat::Dexterity => "DEX",
            Stat::Constitution => "CON",
            Stat::Intelligence => "INT",
            Stat::Wisdom => "WIS",
            Stat::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Stat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.abbreviation() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown stat: {s}")))
    }
}

/// Modifier granted by an ability score: `floor((score - 10) / 2)`.
#[must_use]
pub fn ability_modifier(score: i32) -> i32 {
    // div_euclid floors for negative numerators too (score 9 => -1).
    (score - 10).div_euclid(2)
}

/// The six ability scores of a character, nominally 3–18 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "STR")]
    pub strength: i32,
    #[serde(rename = "DEX")]
    pub dexterity: i32,
    #[serde(rename = "CON")]
    pub constitution: i32,
    #[serde(rename = "INT")]
    pub intelligence: i32,
    #[serde(rename = "WIS")]
    pub wisdom: i32,
    #[serde(rename = "CHA")]
    pub charisma: i32,
}

impl AbilityScores {
    /// Builds scores from values in [`Stat::ALL`] order.
    #[must_use]
    pub fn from_ordered(values: [i32; 6]) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = values;
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Returns the score for `stat`.
    #[must_use]
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Dexterity => self.dexterity,
            Stat::Constitution => self.constitution,
            Stat::Intelligence => self.intelligence,
            Stat::Wisdom => self.wisdom,
            Stat::Charisma => self.charisma,
        }
    }

    /// Returns the modifier for `stat`.
    #[must_use]
    pub fn modifier(&self, stat: Stat) -> i32 {
        ability_modifier(self.get(stat))
    }
}
