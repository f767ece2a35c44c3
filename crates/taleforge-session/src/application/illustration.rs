//! Scene illustration, run as a follow-up of each narrated turn.
//!
//! The narrated state is published before the picture exists. Whatever
//! happens to the illustration task, the story is unaffected.

use std::sync::Arc;

use taleforge_core::ports::{ImageHandle, SceneRenderRequest, SceneVisualizer};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::domain::aggregates::AdventureStatus;

/// Shown when the illustration task died without a message of its own.
pub const ILLUSTRATION_FAILED: &str =
    "The Visualization Agent failed to capture the scene. The magic may be weak.";

/// Result of painting one scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Illustration {
    Ready(ImageHandle),
    /// Soft, user-facing failure message.
    Failed(String),
}

/// An illustration still being painted.
#[derive(Debug)]
pub struct PendingIllustration {
    status_line: &'static str,
    task: JoinHandle<Illustration>,
}

impl PendingIllustration {
    /// Starts painting `request` on the tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(
        visualizer: Arc<dyn SceneVisualizer>,
        request: SceneRenderRequest,
        status: AdventureStatus,
    ) -> Self {
        let task = tokio::spawn(async move {
            match visualizer.render_scene(&request).await {
                Ok(image) => Illustration::Ready(image),
                Err(e) => {
                    warn!(error = %e, "scene illustration failed");
                    Illustration::Failed(e.detail().to_owned())
                }
            }
        });

        Self {
            status_line: status_line(status),
            task,
        }
    }

    /// What to show while the picture is being painted.
    #[must_use]
    pub fn status_line(&self) -> &'static str {
        self.status_line
    }

    /// Waits for the picture.
    pub async fn resolve(self) -> Illustration {
        self.task.await.unwrap_or_else(|e| {
            warn!(error = %e, "illustration task did not complete");
            Illustration::Failed(ILLUSTRATION_FAILED.to_owned())
        })
    }

    /// Gives up on the picture.
    pub fn abort(&self) {
        self.task.abort();
    }
}

fn status_line(status: AdventureStatus) -> &'static str {
    match status {
        AdventureStatus::Ongoing => "The Visualization Agent is painting your scene...",
        AdventureStatus::PlayerDead => "The Visualization Agent is painting your final moments...",
        AdventureStatus::AdventureOver => {
            "The Visualization Agent is painting your story's conclusion..."
        }
    }
}
