//! Explains how the last narration came to be.

use taleforge_core::error::DomainError;
use taleforge_core::ports::TextGenerator;
use taleforge_narrative::application::prompt_builder::build_demystifier_request;
use taleforge_narrative::config::PromptConfig;
use taleforge_narrative::domain::metadata::ApiMetadata;
use tracing::{instrument, warn};

/// Asks the generation boundary for a free-text report about `metadata`.
///
/// # Errors
///
/// Returns `DomainError::Transport` if the call fails, or
/// `DomainError::Contract` on `body` if the report is empty.
#[instrument(skip_all, fields(requested_at = %metadata.requested_at))]
pub async fn request_demystification(
    generator: &dyn TextGenerator,
    prompts: &PromptConfig,
    metadata: &ApiMetadata,
) -> Result<String, DomainError> {
    let reply = generator
        .generate(&build_demystifier_request(prompts, metadata))
        .await
        .inspect_err(|e| warn!(error = %e, "demystification request failed"))?;

    let report = reply.body.into_text();
    if report.trim().is_empty() {
        return Err(DomainError::contract("body", "report is empty"));
    }
    Ok(report)
}
