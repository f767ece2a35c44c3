//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots whose state is only ever changed by folding
/// domain events into it.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Returns a copy of this aggregate with every event in `events` applied,
    /// leaving `self` untouched.
    #[must_use]
    fn with_applied(&self, events: &[Self::Event]) -> Self
    where
        Self: Clone,
    {
        let mut next = self.clone();
        for event in events {
            next.apply(event);
        }
        next
    }
}
