//! Renders the prompt bundle into concrete requests.
//!
//! Templates are filled in a single pass, so a placeholder that happens to
//! appear inside substituted text (a player's custom action, say) is never
//! expanded a second time.

use taleforge_character::domain::character::Character;
use taleforge_core::ports::{GenerationRequest, SceneRenderRequest};
use taleforge_rules::domain::check::CheckOutcome;

use crate::config::{PromptConfig, TurnSettings};
use crate::domain::action::PlayerAction;
use crate::domain::metadata::ApiMetadata;
use crate::domain::phase::NarrativePhase;

/// Story context rendered when nothing has been narrated yet.
pub const EMPTY_STORY: &str = "This is the very beginning of the story.";

/// Lore rendered when none has accumulated yet.
pub const EMPTY_LORE: &str = "No specific lore yet.";

/// Action framing for the opening turn.
pub const OPENING_ACTION: &str = "The adventure is just beginning. Describe the opening scene.";

/// Separator between story entries in the prompt.
pub const STORY_SEPARATOR: &str = "\n---\n";

/// Everything about the session a turn prompt depends on.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub phase: NarrativePhase,
    pub character: &'a Character,
    pub story_log: &'a [String],
    pub action: &'a PlayerAction,
    /// Outcome of a check already resolved for this action.
    pub dice_result: Option<CheckOutcome>,
    /// Use the fixed opening framing instead of describing `action`.
    pub opening: bool,
}

/// Builds the narration request for one turn.
#[must_use]
pub fn build_turn_request(
    config: &PromptConfig,
    settings: &TurnSettings,
    context: &TurnContext<'_>,
) -> GenerationRequest {
    let story = recent_story(context.story_log, settings.history_window);
    let story = if story.is_empty() { EMPTY_STORY.to_owned() } else { story };
    let action = describe_action(context.action, context.dice_result, context.opening);
    let character = context.character.summary();

    let prompt = render_template(
        &config.game_turn.prompt_template,
        &[
            ("current_beat", context.phase.as_str()),
            ("beat_goal", config.beat_goal(context.phase)),
            ("character_string", character.as_str()),
            ("story_log_string", story.as_str()),
            ("action_string", action.as_str()),
        ],
    );

    GenerationRequest::structured(
        config.game_turn.system_instruction.clone(),
        prompt,
        config.game_turn.schema.clone(),
    )
}

/// The last `window` story entries, oldest first, joined by
/// [`STORY_SEPARATOR`].
#[must_use]
pub fn recent_story(story_log: &[String], window: usize) -> String {
    let start = story_log.len().saturating_sub(window);
    story_log[start..].join(STORY_SEPARATOR)
}

/// Natural-language description of what the player did.
#[must_use]
pub fn describe_action(
    action: &PlayerAction,
    dice_result: Option<CheckOutcome>,
    opening: bool,
) -> String {
    if opening {
        return OPENING_ACTION.to_owned();
    }

    match (action, dice_result) {
        (PlayerAction::Custom { text }, Some(outcome)) => format!(
            "The player performed a custom action: \"{text}\". They needed to make a skill \
             check, and the result was a {outcome}. Describe the outcome of their attempt."
        ),
        (PlayerAction::Custom { text }, None) => format!(
            "The player wants to perform a custom action: \"{text}\".\n\
             First, determine if this action's success is uncertain and requires a skill check.\n\
             - If a check IS required: Respond with a 'required_check' object detailing the \
             'stat' and 'dc'. The 'scene_description' must be a short sentence about \
             *attempting* the action (e.g., \"You attempt to pick the lock...\"). The 'options' \
             array must be empty.\n\
             - If a check is NOT required: Describe the outcome of the action directly, provide \
             three new options, and do not include the 'required_check' field."
        ),
        (PlayerAction::Scripted { action_id }, None) => {
            format!("The player chose to perform the action: '{action_id}'.")
        }
        (PlayerAction::Scripted { action_id }, Some(outcome)) => format!(
            "The player chose to perform the action: '{action_id}'. They attempted a skill \
             check and the result was a {outcome}. Describe the outcome of their attempt."
        ),
    }
}

/// Builds the illustration request for a narrated scene.
#[must_use]
pub fn build_scene_render_request(
    config: &PromptConfig,
    scene_description: &str,
    character: &Character,
    art_style: &str,
    visual_lore: &str,
) -> SceneRenderRequest {
    let character_description = character.visual_description();
    let lore = if visual_lore.trim().is_empty() { EMPTY_LORE } else { visual_lore };

    let prompt = render_template(
        &config.visualization.prompt_template,
        &[
            ("character_description", character_description.as_str()),
            ("scene_description", scene_description),
            ("art_style", art_style),
            ("visual_lore", lore),
        ],
    );

    SceneRenderRequest {
        scene_description: scene_description.to_owned(),
        character_description,
        art_style: art_style.to_owned(),
        visual_lore: visual_lore.to_owned(),
        prompt,
    }
}

/// Builds the request for the character-creation options.
#[must_use]
pub fn build_creation_request(config: &PromptConfig) -> GenerationRequest {
    let creation = &config.character_creation;
    GenerationRequest::structured(
        creation.system_instruction.clone(),
        creation.prompt.clone(),
        creation.schema.clone(),
    )
}

/// Builds the free-text request explaining the call behind `metadata`.
#[must_use]
pub fn build_demystifier_request(config: &PromptConfig, metadata: &ApiMetadata) -> GenerationRequest {
    let usage = metadata
        .usage
        .as_ref()
        .and_then(|usage| serde_json::to_string_pretty(usage).ok())
        .unwrap_or_else(|| "{}".to_owned());
    let safety = serde_json::to_string_pretty(&metadata.safety_ratings)
        .unwrap_or_else(|_| "[]".to_owned());
    let finish_reason = metadata.finish_reason.as_deref().unwrap_or("UNKNOWN");

    let prompt = render_template(
        &config.demystifier.prompt_template,
        &[
            ("original_prompt", metadata.original_prompt.as_str()),
            ("usage_metadata", usage.as_str()),
            ("finish_reason", finish_reason),
            ("safety_ratings", safety.as_str()),
        ],
    );

    GenerationRequest::free_text(config.demystifier.system_instruction.clone(), prompt)
}

/// Replaces every `{name}` in `template` whose name is in `values`. Unknown
/// placeholders and stray braces are kept verbatim.
#[must_use]
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substitution = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match substitution {
            Some((value, close)) => {
                rendered.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}
