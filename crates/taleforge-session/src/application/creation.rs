//! Fetches what the creation screen offers, before any session exists.

use taleforge_character::domain::creation::CreationOptions;
use taleforge_core::error::DomainError;
use taleforge_core::ports::TextGenerator;
use taleforge_narrative::application::prompt_builder::build_creation_request;
use taleforge_narrative::config::PromptConfig;
use tracing::{info, instrument, warn};

/// Asks the generation boundary for creation options and validates them.
///
/// # Errors
///
/// Returns `DomainError::Transport` if the call fails, or
/// `DomainError::Contract` naming the first malformed field.
#[instrument(skip_all)]
pub async fn fetch_creation_options(
    generator: &dyn TextGenerator,
    prompts: &PromptConfig,
) -> Result<CreationOptions, DomainError> {
    let reply = generator
        .generate(&build_creation_request(prompts))
        .await
        .inspect_err(|e| warn!(error = %e, "creation options request failed"))?;

    let payload = reply.body.into_json()?;
    let options = CreationOptions::from_payload(&payload)
        .inspect_err(|e| warn!(error = %e, "creation options broke their contract"))?;

    info!(
        races = options.races.len(),
        classes = options.classes.len(),
        weapons = options.weapons.len(),
        "creation options fetched"
    );
    Ok(options)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use taleforge_test_support::{FailingGenerator, ScriptedGenerator};

    use super::*;

    #[tokio::test]
    async fn test_fetch_validates_payload() {
        // Arrange
        let generator = ScriptedGenerator::with_payloads(vec![json!({
            "scene": "Fog rolls over the moor.",
            "style_options": ["ink wash", "oil painting"],
            "stat_array": [15, 14, 13, 12, 10, 8],
            "races": ["Human", "Elf"],
            "classes": ["Rogue"],
            "weapons": ["Dagger"]
        })]);
        let prompts = PromptConfig::builtin().unwrap();

        // Act
        let options = fetch_creation_options(&generator, &prompts).await.unwrap();

        // Assert
        assert_eq!(options.stat_array, vec![15, 14, 13, 12, 10, 8]);
        let requests = generator.requests();
        let request = &requests[0];
        assert_eq!(request.prompt, prompts.character_creation.prompt);
        assert!(request.response_schema.is_some());
    }

    #[tokio::test]
    async fn test_fetch_reports_malformed_field() {
        let generator = ScriptedGenerator::with_payloads(vec![json!({
            "scene": "Fog.",
            "style_options": "ink wash"
        })]);

        let err = fetch_creation_options(&generator, &PromptConfig::builtin().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Contract { ref field, .. } if field == "style_options"));
    }

    #[tokio::test]
    async fn test_fetch_propagates_transport_failure() {
        let err = fetch_creation_options(&FailingGenerator, &PromptConfig::builtin().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Transport(_)));
    }
}
