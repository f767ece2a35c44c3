//! Narration audio: `Idle → Loading → Playing ⇄ Paused → Idle`.
//!
//! Playback itself belongs to the caller; this tracks the clip and its
//! lifecycle. Starting a new scene or stopping while a clip is still being
//! synthesized discards that clip when it arrives.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use taleforge_core::ports::{AudioClip, SpeechSynthesizer};
use tracing::{debug, warn};

/// Shown when speech synthesis fails.
pub const VOICE_FALTERED: &str = "The storyteller's voice faltered.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    Idle,
    Loading,
    Playing,
    Paused,
}

#[derive(Debug)]
struct Playback {
    state: AudioState,
    clip: Option<AudioClip>,
    error: Option<String>,
    /// Bumped by every `start` and `stop`; a synthesis result is only kept if
    /// the generation it was started in is still current.
    generation: u64,
}

/// Speech for the current scene.
pub struct NarrationAudio {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    playback: Mutex<Playback>,
}

impl std::fmt::Debug for NarrationAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationAudio")
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

impl NarrationAudio {
    #[must_use]
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            playback: Mutex::new(Playback {
                state: AudioState::Idle,
                clip: None,
                error: None,
                generation: 0,
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> AudioState {
        self.playback().state
    }

    /// The clip being played or paused.
    #[must_use]
    pub fn clip(&self) -> Option<AudioClip> {
        self.playback().clip.clone()
    }

    /// The soft error of the last failed `start`.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.playback().error.clone()
    }

    /// Tears down any current clip and narrates `scene`.
    ///
    /// Returns the state once synthesis has settled: `Playing` on success,
    /// `Idle` with [`VOICE_FALTERED`] on failure.
    pub async fn start(&self, scene: &str) -> AudioState {
        let generation = {
            let mut playback = self.playback();
            playback.generation += 1;
            playback.state = AudioState::Loading;
            playback.clip = None;
            playback.error = None;
            playback.generation
        };

        let result = self.synthesizer.synthesize_speech(scene).await;

        let mut playback = self.playback();
        if playback.generation != generation {
            debug!("discarding narration for a superseded scene");
            return playback.state;
        }
        match result {
            Ok(clip) => {
                playback.clip = Some(clip);
                playback.state = AudioState::Playing;
            }
            Err(e) => {
                warn!(error = %e, "speech synthesis failed");
                playback.error = Some(VOICE_FALTERED.to_owned());
                playback.state = AudioState::Idle;
            }
        }
        playback.state
    }

    /// `Playing → Paused`. Returns whether the state changed.
    pub fn pause(&self) -> bool {
        self.transition(AudioState::Playing, AudioState::Paused)
    }

    /// `Paused → Playing`. Returns whether the state changed.
    pub fn resume(&self) -> bool {
        self.transition(AudioState::Paused, AudioState::Playing)
    }

    /// Drops the clip and returns to `Idle` from any state.
    pub fn stop(&self) {
        let mut playback = self.playback();
        playback.generation += 1;
        playback.state = AudioState::Idle;
        playback.clip = None;
        playback.error = None;
    }

    fn transition(&self, from: AudioState, to: AudioState) -> bool {
        let mut playback = self.playback();
        if playback.state != from {
            return false;
        }
        playback.state = to;
        true
    }

    fn playback(&self) -> MutexGuard<'_, Playback> {
        self.playback.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
