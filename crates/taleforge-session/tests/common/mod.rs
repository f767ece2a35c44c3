//! Shared helpers for turn-flow integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use taleforge_character::domain::character::Character;
use taleforge_core::error::DomainError;
use taleforge_core::ports::{
    GenerationReply, GenerationRequest, SceneVisualizer, TextGenerator,
};
use taleforge_core::rng::DeterministicRng;
use taleforge_core::time::{Clock, Pacer};
use taleforge_narrative::config::{PromptConfig, TurnSettings};
use taleforge_rules::domain::ability::AbilityScores;
use taleforge_session::application::orchestrator::TurnOrchestrator;
use taleforge_session::application::session::Session;
use taleforge_test_support::{FixedClock, InstantPacer, RecordingVisualizer, SequenceRng};
use tokio::sync::Notify;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// An elven rogue with DEX 16 (+3).
pub fn hero() -> Character {
    Character {
        name: "Mira".into(),
        gender: "Female".into(),
        race: "Elf".into(),
        class: "Rogue".into(),
        weapon: "Dagger".into(),
        description: "a grey cloak".into(),
        stats: AbilityScores::from_ordered([10, 16, 12, 13, 11, 8]),
    }
}

/// A well-formed narration with one option and no pending check.
pub fn scene(text: &str) -> Value {
    json!({
        "scene_description": text,
        "options": [
            { "text": "Press on", "action_id": "press_on", "check": null },
            { "text": "Pick the lock", "action_id": "pick_lock", "check": { "stat": "DEX", "dc": 13 } }
        ],
        "beat_complete": false,
        "player_dead": false,
        "visual_lore_updates": []
    })
}

pub fn orchestrator(
    generator: Arc<dyn TextGenerator>,
    rng: SequenceRng,
    pacer: Arc<dyn Pacer>,
) -> Arc<TurnOrchestrator> {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    Arc::new(TurnOrchestrator::new(
        generator,
        rng,
        fixed_clock(),
        pacer,
        PromptConfig::builtin().unwrap(),
        TurnSettings::default(),
    ))
}

/// A session for [`hero`] whose narrator answers with `generator`.
pub fn build_session(generator: Arc<dyn TextGenerator>, rolls: Vec<u32>) -> Session {
    build_session_with(generator, rolls, Arc::new(InstantPacer), Arc::new(RecordingVisualizer::new()))
}

pub fn build_session_with(
    generator: Arc<dyn TextGenerator>,
    rolls: Vec<u32>,
    pacer: Arc<dyn Pacer>,
    visualizer: Arc<dyn SceneVisualizer>,
) -> Session {
    Session::start(
        orchestrator(generator, SequenceRng::new(rolls), pacer),
        visualizer,
        hero(),
        "ink wash",
    )
}

/// A generator that holds every request until released.
#[derive(Debug)]
pub struct GatedGenerator {
    pub entered: Notify,
    pub release: Notify,
    payload: Value,
}

impl GatedGenerator {
    pub fn new(payload: Value) -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
            payload,
        }
    }
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationReply, DomainError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(GenerationReply::structured(self.payload.clone()))
    }
}
