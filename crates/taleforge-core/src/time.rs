//! Time abstractions: wall clock and narrative pacing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Schedules the dramatic pauses of a turn (e.g. "the dice are rolled...").
///
/// Implementations must yield to the runtime rather than block the thread, so
/// unrelated work keeps running while a turn waits.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits for `duration` before returning.
    async fn pause(&self, duration: Duration);
}

/// Pacer backed by the tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tracing::trace!(millis = duration.as_millis(), "pausing narration");
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokio_pacer_waits_at_least_the_duration() {
        let started = std::time::Instant::now();
        TokioPacer.pause(Duration::from_millis(5)).await;
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_tokio_pacer_does_not_stall_other_tasks() {
        let sleeper = tokio::spawn(async { TokioPacer.pause(Duration::from_millis(200)).await });
        let quick = tokio::spawn(async { 7 });

        assert_eq!(quick.await.unwrap(), 7);
        assert!(!sleeper.is_finished());
        sleeper.await.unwrap();
    }
}
