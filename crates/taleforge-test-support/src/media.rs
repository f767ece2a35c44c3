//! Illustration and speech doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use taleforge_core::error::DomainError;
use taleforge_core::ports::{
    AudioClip, ImageHandle, SceneRenderRequest, SceneVisualizer, SpeechSynthesizer,
};

/// A visualizer that returns a tiny placeholder image and records requests.
#[derive(Debug, Default)]
pub struct RecordingVisualizer {
    requests: Mutex<Vec<SceneRenderRequest>>,
}

impl RecordingVisualizer {
    /// Creates a visualizer with no recorded requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every render request received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<SceneRenderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SceneVisualizer for RecordingVisualizer {
    async fn render_scene(&self, request: &SceneRenderRequest) -> Result<ImageHandle, DomainError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(ImageHandle {
            mime_type: "image/png".to_owned(),
            data: "iVBORw0KGgo=".to_owned(),
        })
    }
}

/// A visualizer that always fails with the given message.
#[derive(Debug)]
pub struct FailingVisualizer(pub &'static str);

#[async_trait]
impl SceneVisualizer for FailingVisualizer {
    async fn render_scene(&self, _request: &SceneRenderRequest) -> Result<ImageHandle, DomainError> {
        Err(DomainError::Transport(self.0.to_owned()))
    }
}

/// A synthesizer that returns a fixed clip and counts calls.
#[derive(Debug, Default)]
pub struct ScriptedSynthesizer {
    texts: Mutex<Vec<String>>,
}

impl ScriptedSynthesizer {
    /// Creates a synthesizer with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every text synthesized so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynthesizer {
    async fn synthesize_speech(&self, text: &str) -> Result<AudioClip, DomainError> {
        self.texts.lock().unwrap().push(text.to_owned());
        Ok(AudioClip {
            data: "AAAA".to_owned(),
            sample_rate: 24_000,
            channels: 1,
        })
    }
}

/// A synthesizer that always fails.
#[derive(Debug)]
pub struct FailingSynthesizer;

#[async_trait]
impl SpeechSynthesizer for FailingSynthesizer {
    async fn synthesize_speech(&self, _text: &str) -> Result<AudioClip, DomainError> {
        Err(DomainError::Transport("no audio data returned".into()))
    }
}
