//! The turn state machine.
//!
//! A turn moves `AwaitingAction → RequestingNarration → [AutoResolvingCheck →
//! RequestingNarration] → ApplyingResult → Idle`. The bracketed detour runs at
//! most once: when the narrator demands a check the caller has not rolled,
//! the engine rolls it, pauses, and asks again with the outcome. A second
//! demand in the same turn is a contract violation.
//!
//! The orchestrator never mutates the state it is given. A completed turn
//! hands back the replacement state together with the events that produced it.

use std::fmt;
use std::sync::{Arc, Mutex};

use taleforge_character::domain::character::Character;
use taleforge_core::aggregate::AggregateRoot;
use taleforge_core::error::DomainError;
use taleforge_core::ports::TextGenerator;
use taleforge_core::rng::DeterministicRng;
use taleforge_core::time::{Clock, Pacer};
use taleforge_narrative::application::prompt_builder::{TurnContext, build_turn_request};
use taleforge_narrative::config::{PromptConfig, TurnSettings};
use taleforge_narrative::domain::action::PlayerAction;
use taleforge_narrative::domain::lore::merge_lore;
use taleforge_narrative::domain::metadata::ApiMetadata;
use taleforge_narrative::domain::phase::advance;
use taleforge_narrative::domain::response::{StructuredTurnResponse, parse_turn_reply};
use taleforge_rules::application::command_handlers::handle_resolve_check;
use taleforge_rules::domain::check::{CheckOutcome, CheckResult, DiceCheck};
use taleforge_rules::domain::commands::ResolveCheck;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::GameState;
use crate::domain::commands::TakeTurn;
use crate::domain::events::{
    AdventureConcluded, AdventureEvent, AdventureEventKind, PlayerDied, SceneNarrated,
};
use crate::error::TurnError;

/// Steps of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    AwaitingAction,
    RequestingNarration,
    AutoResolvingCheck,
    ApplyingResult,
    Idle,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AwaitingAction => "awaiting_action",
            Self::RequestingNarration => "requesting_narration",
            Self::AutoResolvingCheck => "auto_resolving_check",
            Self::ApplyingResult => "applying_result",
            Self::Idle => "idle",
        })
    }
}

/// A check the engine rolled on the player's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoCheck {
    pub check: DiceCheck,
    pub result: CheckResult,
}

impl AutoCheck {
    /// Status line shown while the narrative pause runs.
    #[must_use]
    pub fn announcement(&self) -> String {
        format!(
            "Your action requires a {} check (DC {})! The dice are rolled automatically...",
            self.check.stat, self.check.dc
        )
    }
}

/// Everything a completed turn produced.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// The replacement game state.
    pub state: GameState,
    /// Events folded into `state`, in order.
    pub events: Vec<AdventureEvent>,
    /// The narration that was applied.
    pub response: StructuredTurnResponse,
    /// Diagnostics of the call that produced `response`.
    pub metadata: ApiMetadata,
    pub auto_check: Option<AutoCheck>,
    /// Stages visited, from `AwaitingAction` to `Idle`.
    pub stages: Vec<TurnStage>,
}

/// Runs turns against the generation boundary.
pub struct TurnOrchestrator {
    generator: Arc<dyn TextGenerator>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    clock: Arc<dyn Clock>,
    pacer: Arc<dyn Pacer>,
    prompts: PromptConfig,
    settings: TurnSettings,
}

impl fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl TurnOrchestrator {
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        clock: Arc<dyn Clock>,
        pacer: Arc<dyn Pacer>,
        prompts: PromptConfig,
        settings: TurnSettings,
    ) -> Self {
        Self {
            generator,
            rng,
            clock,
            pacer,
            prompts,
            settings,
        }
    }

    #[must_use]
    pub fn prompts(&self) -> &PromptConfig {
        &self.prompts
    }

    #[must_use]
    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    /// The generation boundary, shared with follow-up requests.
    #[must_use]
    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Plays one turn against `state`.
    ///
    /// The opening framing is used when nothing has been narrated yet or the
    /// action is `start_game`.
    ///
    /// # Errors
    ///
    /// - `TurnError::TerminalState` if the adventure has already ended.
    /// - `TurnError::Domain` with `Validation` for a blank custom action,
    ///   `Transport` when the generation call fails, `Contract` when the reply
    ///   is malformed or demands a second check, `Infrastructure` if the RNG
    ///   lock is poisoned.
    ///
    /// `state` is never modified.
    #[instrument(
        skip_all,
        fields(
            session_id = %state.id,
            correlation_id = %command.correlation_id,
            action = command.action.action_id(),
        )
    )]
    pub async fn take_turn(
        &self,
        state: &GameState,
        command: &TakeTurn,
    ) -> Result<TurnReport, TurnError> {
        let mut stages = vec![TurnStage::AwaitingAction];

        if state.status.is_terminal() {
            warn!(status = %state.status, "turn rejected, adventure has ended");
            return Err(TurnError::TerminalState(state.status));
        }
        if let PlayerAction::Custom { text } = &command.action {
            if text.trim().is_empty() {
                return Err(DomainError::Validation("custom action must not be blank".into()).into());
            }
        }

        let opening = state.story_log.is_empty() || command.action.is_start_game();
        let mut dice_result = command.dice_result;
        let mut auto_check: Option<AutoCheck> = None;

        let (response, metadata) = loop {
            enter(&mut stages, TurnStage::RequestingNarration);
            let (response, metadata) = self
                .request_narration(state, &command.action, dice_result, opening)
                .await?;

            match response.required_check {
                Some(check) if auto_check.is_some() => {
                    warn!(stat = %check.stat, dc = check.dc, "second check demanded after an automatic check");
                    return Err(DomainError::contract(
                        "required_check",
                        "a check was demanded after the automatic check was resolved",
                    )
                    .into());
                }
                Some(check) if dice_result.is_none() => {
                    enter(&mut stages, TurnStage::AutoResolvingCheck);
                    let result =
                        self.resolve_check(check, &state.character, command.correlation_id)?;
                    let rolled = AutoCheck { check, result };
                    debug!(announcement = %rolled.announcement(), "pausing before outcome");
                    dice_result = Some(result.outcome);
                    auto_check = Some(rolled);
                    self.pacer.pause(self.settings.auto_check_pause()).await;
                }
                _ => break (response, metadata),
            }
        };

        enter(&mut stages, TurnStage::ApplyingResult);
        let events = self.build_events(state, &response, command.correlation_id);
        let next = state.with_applied(&events);
        enter(&mut stages, TurnStage::Idle);

        info!(
            phase = %next.phase,
            status = %next.status,
            story_len = next.story_log.len(),
            auto_checked = auto_check.is_some(),
            "turn applied"
        );

        Ok(TurnReport {
            state: next,
            events,
            response,
            metadata,
            auto_check,
            stages,
        })
    }

    async fn request_narration(
        &self,
        state: &GameState,
        action: &PlayerAction,
        dice_result: Option<CheckOutcome>,
        opening: bool,
    ) -> Result<(StructuredTurnResponse, ApiMetadata), DomainError> {
        let request = build_turn_request(
            &self.prompts,
            &self.settings,
            &TurnContext {
                phase: state.phase,
                character: &state.character,
                story_log: &state.story_log,
                action,
                dice_result,
                opening,
            },
        );

        let requested_at = self.clock.now();
        let reply = self
            .generator
            .generate(&request)
            .await
            .inspect_err(|e| warn!(error = %e, "narration request failed"))?;

        let metadata = ApiMetadata::from_reply(&reply, request.prompt, requested_at);
        let response = parse_turn_reply(reply.body)
            .inspect_err(|e| warn!(error = %e, "narration broke its contract"))?;

        Ok((response, metadata))
    }

    /// Rolls `check` for `character` on the shared RNG.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the RNG lock is poisoned.
    pub fn resolve_check(
        &self,
        check: DiceCheck,
        character: &Character,
        correlation_id: Uuid,
    ) -> Result<CheckResult, DomainError> {
        let command = ResolveCheck {
            correlation_id,
            check,
            score: character.stats.get(check.stat),
        };
        handle_resolve_check(&command, &self.rng)
    }

    fn build_events(
        &self,
        state: &GameState,
        response: &StructuredTurnResponse,
        correlation_id: Uuid,
    ) -> Vec<AdventureEvent> {
        let progress = advance(state.phase, response.beat_complete);
        let lore = merge_lore(&state.lore, &response.visual_lore_updates);

        let mut kinds = vec![AdventureEventKind::SceneNarrated(SceneNarrated {
            scene_description: response.scene_description.clone(),
            phase: progress.next,
            lore,
        })];
        if response.player_dead {
            kinds.push(AdventureEventKind::PlayerDied(PlayerDied {
                phase: progress.next,
            }));
        } else if progress.story_ended {
            kinds.push(AdventureEventKind::AdventureConcluded(AdventureConcluded {
                phase: progress.next,
            }));
        }

        let occurred_at = self.clock.now();
        kinds
            .into_iter()
            .zip(state.version() + 1..)
            .map(|(kind, sequence)| {
                AdventureEvent::new(state.id, sequence, correlation_id, occurred_at, kind)
            })
            .collect()
    }
}

fn enter(stages: &mut Vec<TurnStage>, stage: TurnStage) {
    debug!(%stage, "turn stage");
    stages.push(stage);
}
