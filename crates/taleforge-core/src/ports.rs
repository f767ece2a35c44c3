//! Ports to the external services the engine consumes.
//!
//! The engine never talks to a network client directly. Text generation,
//! scene illustration and speech synthesis are reached through the traits in
//! this module, and every payload that comes back is re-validated locally by
//! the context that consumes it.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A single request to the text generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Standing instruction for the model, if any.
    pub system_instruction: Option<String>,
    /// The rendered prompt.
    pub prompt: String,
    /// JSON schema the service should constrain its answer to. `None` asks
    /// for free text.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// A request whose answer must follow `schema`.
    #[must_use]
    pub fn structured(
        system_instruction: impl Into<String>,
        prompt: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            system_instruction: Some(system_instruction.into()),
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }

    /// A request for an unconstrained text answer.
    #[must_use]
    pub fn free_text(system_instruction: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: Some(system_instruction.into()),
            prompt: prompt.into(),
            response_schema: None,
        }
    }
}

/// Token accounting reported by the generation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt.
    pub prompt_token_count: Option<u32>,
    /// Tokens produced in the answer.
    pub candidates_token_count: Option<u32>,
    /// Sum of both.
    pub total_token_count: Option<u32>,
}

/// One safety classification attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRating {
    /// Harm category.
    pub category: Option<String>,
    /// Estimated probability bucket.
    pub probability: Option<String>,
}

/// What the generation service answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    /// The transport already decoded a JSON document.
    Structured(serde_json::Value),
    /// Raw model text, possibly wrapping JSON in a fenced code block.
    Text(String),
}

impl ReplyBody {
    /// Decodes the body into a JSON document.
    ///
    /// Text is first searched for a fenced `json` block; if that block is
    /// absent or does not parse, the whole text is parsed instead.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` on the `body` field when no JSON
    /// document can be recovered.
    pub fn into_json(self) -> Result<serde_json::Value, DomainError> {
        match self {
            Self::Structured(value) => Ok(value),
            Self::Text(text) => {
                if let Some(block) = fenced_json_block(&text) {
                    match serde_json::from_str(block) {
                        Ok(value) => return Ok(value),
                        Err(e) => tracing::debug!(error = %e, "fenced json block did not parse"),
                    }
                }
                serde_json::from_str(&text).map_err(|e| {
                    DomainError::contract("body", format!("reply is not valid JSON: {e}"))
                })
            }
        }
    }

    /// Returns the body as display text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Structured(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n([\s\S]*?)\n```").expect("valid regex"));

fn fenced_json_block(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .as_ref()
        .map(regex_lite::Match::as_str)
}

/// A generation answer together with the service's diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReply {
    /// The answer itself.
    pub body: ReplyBody,
    /// Token accounting, when reported.
    pub usage: Option<UsageMetadata>,
    /// Why generation stopped, when reported.
    pub finish_reason: Option<String>,
    /// Safety classifications, when reported.
    pub safety_ratings: Vec<SafetyRating>,
}

impl GenerationReply {
    /// A reply carrying an already decoded JSON document and no diagnostics.
    #[must_use]
    pub fn structured(value: serde_json::Value) -> Self {
        Self::from_body(ReplyBody::Structured(value))
    }

    /// A reply carrying raw text and no diagnostics.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_body(ReplyBody::Text(text.into()))
    }

    fn from_body(body: ReplyBody) -> Self {
        Self {
            body,
            usage: None,
            finish_reason: None,
            safety_ratings: Vec::new(),
        }
    }
}

/// Text generation boundary.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one request and returns the service's answer.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationReply, DomainError>;
}

/// Everything the illustration service needs to paint a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRenderRequest {
    /// The narrated scene.
    pub scene_description: String,
    /// Appearance of the player character.
    pub character_description: String,
    /// Art style chosen at character creation.
    pub art_style: String,
    /// Accumulated world detail for visual consistency.
    pub visual_lore: String,
    /// The fully rendered image prompt.
    pub prompt: String,
}

/// An encoded image produced by the illustration service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    /// MIME type of the encoded data.
    pub mime_type: String,
    /// Base64 image bytes.
    pub data: String,
}

impl ImageHandle {
    /// Renders the image as a `data:` URL.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Scene illustration boundary.
#[async_trait]
pub trait SceneVisualizer: Send + Sync {
    /// Paints one scene.
    async fn render_scene(&self, request: &SceneRenderRequest) -> Result<ImageHandle, DomainError>;
}

/// Synthesized narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Base64 PCM bytes.
    pub data: String,
    /// Samples per second.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Narration speech boundary.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Reads `text` aloud.
    async fn synthesize_speech(&self, text: &str) -> Result<AudioClip, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_body_passes_through() {
        let body = ReplyBody::Structured(json!({ "scene": "A cave." }));
        assert_eq!(body.into_json().unwrap(), json!({ "scene": "A cave." }));
    }

    #[test]
    fn test_text_body_prefers_fenced_json_block() {
        let text = "Here you go:\n```json\n{\"player_dead\": false}\n```\nEnjoy.";
        let value = ReplyBody::Text(text.to_owned()).into_json().unwrap();
        assert_eq!(value, json!({ "player_dead": false }));
    }

    #[test]
    fn test_text_body_falls_back_to_whole_text() {
        let value = ReplyBody::Text("{\"beat_complete\": true}".to_owned())
            .into_json()
            .unwrap();
        assert_eq!(value, json!({ "beat_complete": true }));
    }

    #[test]
    fn test_broken_fenced_block_falls_back_to_whole_text_and_fails() {
        let text = "```json\n{not json}\n```";
        let err = ReplyBody::Text(text.to_owned()).into_json().unwrap_err();
        assert!(matches!(err, DomainError::Contract { ref field, .. } if field == "body"));
    }

    #[test]
    fn test_first_fenced_block_wins_over_later_ones() {
        let text = "```json\n{\"beat_complete\": true}\n```\nand\n```json\n{\"beat_complete\": false}\n```";
        let value = ReplyBody::Text(text.to_owned()).into_json().unwrap();
        assert_eq!(value, json!({ "beat_complete": true }));
    }

    #[test]
    fn test_fenced_block_spans_multiple_lines() {
        let text = "```json\n{\n  \"player_dead\": true\n}\n```";
        assert_eq!(fenced_json_block(text), Some("{\n  \"player_dead\": true\n}"));
        assert_eq!(fenced_json_block("```json {} ```"), None);
    }

    #[test]
    fn test_image_handle_data_url() {
        let handle = ImageHandle {
            mime_type: "image/png".to_owned(),
            data: "QUJD".to_owned(),
        };
        assert_eq!(handle.data_url(), "data:image/png;base64,QUJD");
    }
}
