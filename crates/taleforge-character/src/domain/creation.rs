//! Character creation: the offered options and the player's draft.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use taleforge_core::contract::PayloadObject;
use taleforge_core::error::DomainError;
use taleforge_rules::domain::ability::{AbilityScores, Stat};
use tracing::debug;

use super::character::Character;

/// Name given to a character whose player left the name blank.
pub const DEFAULT_NAME: &str = "Nameless Wanderer";

/// Description given to a character whose player left it blank.
pub const DEFAULT_DESCRIPTION: &str = "An ordinary person in extraordinary circumstances.";

/// Everything offered to the player on the creation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationOptions {
    /// Atmospheric framing shown above the form.
    pub scene: String,
    /// Suggested art styles; the player may also describe their own.
    pub style_options: Vec<String>,
    /// The six scores to distribute over the stats.
    pub stat_array: Vec<i32>,
    pub races: Vec<String>,
    pub classes: Vec<String>,
    pub weapons: Vec<String>,
}

impl CreationOptions {
    /// Validates a raw generation payload into creation options.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` naming the first missing or mistyped
    /// field, or `stat_array` if it does not hold exactly six scores.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, DomainError> {
        let object = PayloadObject::root(payload)?;

        let scene = object.non_empty_string("scene")?.to_owned();
        let style_options = object.string_array("style_options")?;
        let stat_array = object.integer_array("stat_array")?;
        if stat_array.len() != Stat::ALL.len() {
            return Err(DomainError::contract(
                "stat_array",
                format!("expected {} scores, found {}", Stat::ALL.len(), stat_array.len()),
            ));
        }

        Ok(Self {
            scene,
            style_options,
            stat_array,
            races: object.string_array("races")?,
            classes: object.string_array("classes")?,
            weapons: object.string_array("weapons")?,
        })
    }
}

/// What the player filled in on the creation screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterDraft {
    pub name: String,
    pub gender: String,
    pub race: String,
    pub class: String,
    pub weapon: String,
    pub description: String,
    /// Scores assigned so far, drawn from [`CreationOptions::stat_array`].
    pub stats: BTreeMap<Stat, i32>,
    /// A suggested style or the player's own description.
    pub art_style: String,
}

/// A finished character together with the chosen art style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCharacter {
    pub character: Character,
    pub art_style: String,
}

impl CharacterDraft {
    /// Checks the draft against `options` and produces the immutable character.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a required field is blank, a
    /// race/class/weapon was not offered, a stat is unassigned, or the
    /// assigned scores are not a draw from the offered stat array.
    pub fn finalize(self, options: &CreationOptions) -> Result<CreatedCharacter, DomainError> {
        let gender = required(&self.gender, "gender")?;
        let race = offered(&self.race, "race", &options.races)?;
        let class = offered(&self.class, "class", &options.classes)?;
        let weapon = offered(&self.weapon, "weapon", &options.weapons)?;
        let art_style = required(&self.art_style, "art style")?;
        let stats = assign_stats(&self.stats, &options.stat_array)?;

        let name = match self.name.trim() {
            "" => DEFAULT_NAME.to_owned(),
            name => name.to_owned(),
        };
        let description = match self.description.trim() {
            "" => DEFAULT_DESCRIPTION.to_owned(),
            description => description.to_owned(),
        };

        debug!(%name, %race, %class, "character finalized");

        Ok(CreatedCharacter {
            character: Character {
                name,
                gender,
                race,
                class,
                weapon,
                description,
                stats,
            },
            art_style,
        })
    }
}

fn required(value: &str, label: &str) -> Result<String, DomainError> {
    match value.trim() {
        "" => Err(DomainError::Validation(format!("{label} is required"))),
        value => Ok(value.to_owned()),
    }
}

fn offered(value: &str, label: &str, choices: &[String]) -> Result<String, DomainError> {
    let value = required(value, label)?;
    if choices.iter().any(|choice| *choice == value) {
        Ok(value)
    } else {
        Err(DomainError::Validation(format!(
            "{label} `{value}` is not one of the offered options"
        )))
    }
}

fn assign_stats(
    assigned: &BTreeMap<Stat, i32>,
    stat_array: &[i32],
) -> Result<AbilityScores, DomainError> {
    let mut pool = stat_array.to_vec();
    let mut ordered = [0; 6];

    for (slot, stat) in ordered.iter_mut().zip(Stat::ALL) {
        let score = *assigned
            .get(&stat)
            .ok_or_else(|| DomainError::Validation(format!("{stat} has no score assigned")))?;
        let position = pool.iter().position(|&v| v == score).ok_or_else(|| {
            DomainError::Validation(format!(
                "{stat} score {score} is not available in the stat array"
            ))
        })?;
        pool.swap_remove(position);
        *slot = score;
    }

    Ok(AbilityScores::from_ordered(ordered))
}
