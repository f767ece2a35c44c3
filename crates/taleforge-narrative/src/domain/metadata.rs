//! Diagnostics recorded for the last narration call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taleforge_core::ports::{GenerationReply, SafetyRating, UsageMetadata};

/// What the generation service reported about one turn's call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMetadata {
    pub usage: Option<UsageMetadata>,
    pub finish_reason: Option<String>,
    pub safety_ratings: Vec<SafetyRating>,
    /// The exact prompt that produced the reply.
    pub original_prompt: String,
    pub requested_at: DateTime<Utc>,
}

impl ApiMetadata {
    /// Captures the diagnostics of `reply`, which answered `original_prompt`.
    #[must_use]
    pub fn from_reply(
        reply: &GenerationReply,
        original_prompt: impl Into<String>,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            usage: reply.usage.clone(),
            finish_reason: reply.finish_reason.clone(),
            safety_ratings: reply.safety_ratings.clone(),
            original_prompt: original_prompt.into(),
            requested_at,
        }
    }
}
