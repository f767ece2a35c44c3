//! One adventure, as seen by the player.
//!
//! The session owns the live [`GameState`] and admits one turn at a time.
//! A turn works on a snapshot; its result replaces the live state in a single
//! write, so readers see either the whole previous turn or the whole next one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use taleforge_character::domain::character::Character;
use taleforge_core::error::DomainError;
use taleforge_core::ports::SceneVisualizer;
use taleforge_narrative::application::prompt_builder::build_scene_render_request;
use taleforge_narrative::domain::action::PlayerAction;
use taleforge_narrative::domain::metadata::ApiMetadata;
use taleforge_narrative::domain::response::{StructuredTurnResponse, TurnOption};
use taleforge_rules::domain::check::{CheckOutcome, CheckResult};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::demystify::request_demystification;
use super::illustration::PendingIllustration;
use super::orchestrator::{AutoCheck, TurnOrchestrator, TurnReport};
use crate::domain::aggregates::{AdventureStatus, GameState};
use crate::domain::commands::TakeTurn;
use crate::domain::events::AdventureEvent;
use crate::error::TurnError;

/// What the player sees after a turn.
#[derive(Debug)]
pub struct CompletedTurn {
    /// The state now live in the session.
    pub state: GameState,
    pub response: StructuredTurnResponse,
    pub auto_check: Option<AutoCheck>,
    /// The roll made for a gated option, see [`Session::choose_option`].
    pub option_check: Option<CheckResult>,
    /// The scene's picture, still being painted.
    pub illustration: PendingIllustration,
}

#[derive(Debug, Clone)]
struct LastTurn {
    response: StructuredTurnResponse,
    metadata: ApiMetadata,
}

/// A running adventure.
pub struct Session {
    orchestrator: Arc<TurnOrchestrator>,
    visualizer: Arc<dyn SceneVisualizer>,
    state: RwLock<GameState>,
    last_turn: RwLock<Option<LastTurn>>,
    journal: Mutex<Vec<AdventureEvent>>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session for a finished character. Nothing is narrated until
    /// [`Session::begin`].
    #[must_use]
    pub fn start(
        orchestrator: Arc<TurnOrchestrator>,
        visualizer: Arc<dyn SceneVisualizer>,
        character: Character,
        art_style: impl Into<String>,
    ) -> Self {
        let state = GameState::new(Uuid::new_v4(), character, art_style);
        info!(session_id = %state.id, character = %state.character.name, "session started");

        Self {
            orchestrator,
            visualizer,
            state: RwLock::new(state),
            last_turn: RwLock::new(None),
            journal: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        read(&self.state).id
    }

    /// Narrates the opening scene.
    ///
    /// # Errors
    ///
    /// See [`Session::take_turn`].
    pub async fn begin(&self) -> Result<CompletedTurn, TurnError> {
        self.take_turn(PlayerAction::start_game(), None).await
    }

    /// Plays one turn and, on success, starts illustrating the new scene.
    ///
    /// # Errors
    ///
    /// - `TurnError::InFlight` if another turn of this session is running.
    /// - Anything [`TurnOrchestrator::take_turn`] reports.
    ///
    /// The live state is untouched on every error.
    #[instrument(skip(self, action), fields(action = action.action_id()))]
    pub async fn take_turn(
        &self,
        action: PlayerAction,
        dice_result: Option<CheckOutcome>,
    ) -> Result<CompletedTurn, TurnError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("turn rejected, another turn is in flight");
            return Err(TurnError::InFlight);
        };

        self.play(&TakeTurn::new(action, dice_result), None).await
    }

    /// Plays one of the options the last scene presented.
    ///
    /// A gated option is rolled first, with the character's modifier for the
    /// option's stat, on the same RNG that resolves automatic checks. The
    /// roll is returned as [`CompletedTurn::option_check`].
    ///
    /// # Errors
    ///
    /// - `TurnError::InFlight` if another turn of this session is running.
    /// - `TurnError::TerminalState` if the adventure has ended. Nothing is
    ///   rolled in that case.
    /// - Anything [`TurnOrchestrator::take_turn`] reports.
    #[instrument(skip_all, fields(action = %option.action_id, gated = option.check.is_some()))]
    pub async fn choose_option(&self, option: &TurnOption) -> Result<CompletedTurn, TurnError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("option rejected, another turn is in flight");
            return Err(TurnError::InFlight);
        };

        let current = self.snapshot();
        if current.status.is_terminal() {
            return Err(TurnError::TerminalState(current.status));
        }

        let mut command = TakeTurn::new(PlayerAction::scripted(option.action_id.clone()), None);
        let Some(check) = option.check else {
            return self.play(&command, None).await;
        };

        let result = self
            .orchestrator
            .resolve_check(check, &current.character, command.correlation_id)?;
        command.dice_result = Some(result.outcome);
        self.play(&command, Some(result)).await
    }

    async fn play(
        &self,
        command: &TakeTurn,
        option_check: Option<CheckResult>,
    ) -> Result<CompletedTurn, TurnError> {
        let current = self.snapshot();
        let report = self.orchestrator.take_turn(&current, command).await?;

        *write(&self.state) = report.state.clone();
        *write(&self.last_turn) = Some(LastTurn {
            response: report.response.clone(),
            metadata: report.metadata.clone(),
        });
        lock(&self.journal).extend(report.events.iter().cloned());

        let illustration = self.illustrate(&report);
        Ok(CompletedTurn {
            state: report.state,
            response: report.response,
            auto_check: report.auto_check,
            option_check,
            illustration,
        })
    }

    /// Asks for an explanation of the last narration call.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` before the first turn, otherwise
    /// whatever the report request fails with.
    pub async fn demystify_last_turn(&self) -> Result<String, DomainError> {
        let metadata = self
            .last_metadata()
            .ok_or_else(|| DomainError::Validation("no turn has been narrated yet".into()))?;
        request_demystification(
            self.orchestrator.generator(),
            self.orchestrator.prompts(),
            &metadata,
        )
        .await
    }

    /// A copy of the live state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        read(&self.state).clone()
    }

    #[must_use]
    pub fn status(&self) -> AdventureStatus {
        read(&self.state).status
    }

    #[must_use]
    pub fn is_player_dead(&self) -> bool {
        self.status() == AdventureStatus::PlayerDead
    }

    #[must_use]
    pub fn is_adventure_over(&self) -> bool {
        self.status() == AdventureStatus::AdventureOver
    }

    #[must_use]
    pub fn is_turn_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The narration applied by the last successful turn.
    #[must_use]
    pub fn last_response(&self) -> Option<StructuredTurnResponse> {
        read(&self.last_turn).as_ref().map(|turn| turn.response.clone())
    }

    #[must_use]
    pub fn last_metadata(&self) -> Option<ApiMetadata> {
        read(&self.last_turn).as_ref().map(|turn| turn.metadata.clone())
    }

    /// Every event applied so far, oldest first.
    #[must_use]
    pub fn journal(&self) -> Vec<AdventureEvent> {
        lock(&self.journal).clone()
    }

    fn illustrate(&self, report: &TurnReport) -> PendingIllustration {
        let request = build_scene_render_request(
            self.orchestrator.prompts(),
            &report.response.scene_description,
            &report.state.character,
            &report.state.art_style,
            &report.state.lore,
        );
        PendingIllustration::spawn(Arc::clone(&self.visualizer), request, report.state.status)
    }
}

/// Holds the session's in-flight flag for the duration of a turn.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// Every write replaces the whole value, so a poisoned lock still holds a
// consistent one.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
