//! The player character.

use serde::{Deserialize, Serialize};
use taleforge_rules::domain::ability::AbilityScores;

/// An adventurer. Immutable once created; owned by its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub gender: String,
    pub race: String,
    pub class: String,
    pub weapon: String,
    /// Free-text appearance and background.
    pub description: String,
    pub stats: AbilityScores,
}

impl Character {
    /// One-line summary handed to the narrator each turn.
    #[must_use]
    pub fn summary(&self) -> String {
        // Serializing a plain struct of integers cannot fail.
        let stats = serde_json::to_string(&self.stats).unwrap_or_default();
        format!(
            "Name: {}, Gender: {}, Race: {}, Class: {}, Weapon: {}. Description: {}. Stats: {stats}",
            self.name, self.gender, self.race, self.class, self.weapon, self.description
        )
    }

    /// Appearance phrase handed to the illustrator.
    #[must_use]
    pub fn visual_description(&self) -> String {
        format!(
            "{} {} {} named {}, wearing {}, wielding a {}",
            self.gender, self.race, self.class, self.name, self.description, self.weapon
        )
    }
}
