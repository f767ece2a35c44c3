//! Prompt bundle and turn tuning.
//!
//! Both are plain values handed to the orchestrator at construction, so a
//! test can run the engine against a fixture bundle.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taleforge_core::error::DomainError;
use tracing::debug;

use crate::domain::phase::NarrativePhase;

/// Goal used when the bundle has none for the current phase.
pub const FALLBACK_BEAT_GOAL: &str = "Continue the story.";

const BUILTIN_PROMPTS: &str = include_str!("../prompts/default.json");

/// Every prompt the engine sends upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub character_creation: CreationPrompt,
    pub game_turn: TurnPrompt,
    pub visualization: VisualizationPrompt,
    pub demystifier: DemystifierPrompt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationPrompt {
    pub system_instruction: String,
    pub prompt: String,
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnPrompt {
    pub system_instruction: String,
    /// Uses `{current_beat}`, `{beat_goal}`, `{character_string}`,
    /// `{story_log_string}` and `{action_string}`.
    pub prompt_template: String,
    #[serde(default)]
    pub beat_goals: BTreeMap<NarrativePhase, String>,
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationPrompt {
    /// Uses `{character_description}`, `{scene_description}`, `{art_style}`
    /// and `{visual_lore}`.
    pub prompt_template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemystifierPrompt {
    pub system_instruction: String,
    /// Uses `{original_prompt}`, `{usage_metadata}`, `{finish_reason}` and
    /// `{safety_ratings}`.
    pub prompt_template: String,
}

impl PromptConfig {
    /// The bundle shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the embedded bundle is corrupt.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_json_str(BUILTIN_PROMPTS)
    }

    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if `json` is not a valid bundle.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::Infrastructure(format!("invalid prompt bundle: {e}")))
    }

    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if `yaml` is not a valid bundle.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| DomainError::Infrastructure(format!("invalid prompt bundle: {e}")))
    }

    /// Reads a bundle from disk; `.yaml` and `.yml` files are parsed as YAML,
    /// anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Infrastructure(format!("cannot read {}: {e}", path.display()))
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        debug!(path = %path.display(), is_yaml, "loading prompt bundle");

        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Narrative goal for `phase`, falling back to [`FALLBACK_BEAT_GOAL`].
    #[must_use]
    pub fn beat_goal(&self, phase: NarrativePhase) -> &str {
        self.game_turn
            .beat_goals
            .get(&phase)
            .map_or(FALLBACK_BEAT_GOAL, String::as_str)
    }
}

/// Tuning for the turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnSettings {
    /// How many of the latest story entries are sent with each turn.
    pub history_window: usize,
    /// Pause between an automatic check and the narration of its outcome.
    pub auto_check_pause_ms: u64,
}

impl TurnSettings {
    #[must_use]
    pub fn auto_check_pause(&self) -> Duration {
        Duration::from_millis(self.auto_check_pause_ms)
    }
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            history_window: 5,
            auto_check_pause_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_YAML: &str = r#"
character_creation:
  system_instruction: "You run the table."
  prompt: "Offer options."
  schema: { type: OBJECT }
game_turn:
  system_instruction: "Narrate."
  prompt_template: "{current_beat}: {action_string}"
  beat_goals:
    CONFLICT: "Raise the stakes."
  schema:
    type: OBJECT
    required: [scene_description]
visualization:
  prompt_template: "{scene_description} in {art_style}"
demystifier:
  system_instruction: "Explain."
  prompt_template: "{original_prompt}"
"#;

    #[test]
    fn test_builtin_bundle_parses_and_has_goals_for_story_phases() {
        // Act
        let config = PromptConfig::builtin().unwrap();

        // Assert
        for phase in [
            NarrativePhase::Hook,
            NarrativePhase::Conflict,
            NarrativePhase::Resolution,
            NarrativePhase::Epilogue,
        ] {
            assert_ne!(config.beat_goal(phase), FALLBACK_BEAT_GOAL, "{phase}");
        }
        assert!(config.game_turn.prompt_template.contains("{action_string}"));
    }

    #[test]
    fn test_yaml_bundle_parses() {
        let config = PromptConfig::from_yaml_str(FIXTURE_YAML).unwrap();

        assert_eq!(config.beat_goal(NarrativePhase::Conflict), "Raise the stakes.");
        assert_eq!(config.game_turn.schema["required"][0], "scene_description");
    }

    #[test]
    fn test_missing_goal_falls_back() {
        let config = PromptConfig::from_yaml_str(FIXTURE_YAML).unwrap();

        assert_eq!(config.beat_goal(NarrativePhase::Hook), FALLBACK_BEAT_GOAL);
    }

    #[test]
    fn test_malformed_bundle_is_an_infrastructure_error() {
        let err = PromptConfig::from_json_str("{\"game_turn\": 3}").unwrap_err();

        assert!(matches!(err, DomainError::Infrastructure(_)));
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("taleforge-prompts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let yaml_path = dir.join("bundle.yml");
        let json_path = dir.join("bundle.json");
        std::fs::write(&yaml_path, FIXTURE_YAML).unwrap();
        std::fs::write(&json_path, BUILTIN_PROMPTS).unwrap();

        // Act
        let from_yaml = PromptConfig::load(&yaml_path).unwrap();
        let from_json = PromptConfig::load(&json_path).unwrap();

        // Assert
        assert_eq!(from_yaml.visualization.prompt_template, "{scene_description} in {art_style}");
        assert_eq!(from_json, PromptConfig::builtin().unwrap());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = PromptConfig::load(Path::new("/nonexistent/taleforge.json")).unwrap_err();

        assert!(matches!(err, DomainError::Infrastructure(_)));
    }

    #[test]
    fn test_turn_settings_defaults_fill_missing_fields() {
        let settings: TurnSettings = serde_json::from_str(r#"{ "history_window": 3 }"#).unwrap();

        assert_eq!(settings.history_window, 3);
        assert_eq!(settings.auto_check_pause(), Duration::from_secs(2));
    }
}
