//! Text generation doubles.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use taleforge_core::error::DomainError;
use taleforge_core::ports::{GenerationReply, GenerationRequest, TextGenerator};

/// A generator that answers from a queue of scripted replies and records every
/// request it receives. Once the queue is empty it fails with a transport
/// error.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<GenerationReply, DomainError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    /// Creates a generator that will answer with `replies` in order.
    #[must_use]
    pub fn new(replies: Vec<Result<GenerationReply, DomainError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a generator answering with structured JSON documents in order.
    #[must_use]
    pub fn with_payloads(payloads: Vec<serde_json::Value>) -> Self {
        Self::new(
            payloads
                .into_iter()
                .map(|payload| Ok(GenerationReply::structured(payload)))
                .collect(),
        )
    }

    /// Returns a snapshot of every request received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of scripted replies not yet consumed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationReply, DomainError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::Transport("script exhausted".into())))
    }
}

/// A generator that always fails with a transport error.
#[derive(Debug)]
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationReply, DomainError> {
        Err(DomainError::Transport("connection refused".into()))
    }
}
