//! State management module
//!
//! In-memory state owned by the engine: the event registry and the
//! registration ledger, always mutated together under one lock.

pub mod ledger;
pub mod registry;
pub mod seed;

use crate::models::{Event, EventId, Snapshot, UpdateEventRequest};
use crate::utils::errors::Result;

pub use ledger::RegistrationLedger;
pub use registry::EventRegistry;

/// The event registry and registration ledger as one unit
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub registry: EventRegistry,
    pub ledger: RegistrationLedger,
}

impl EngineState {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            registry: EventRegistry::from_events(snapshot.events),
            ledger: RegistrationLedger::from_parts(snapshot.registrations, snapshot.interested, snapshot.favorites),
        }
    }

    /// Owned copy of the four collections
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            events: self.registry.list().to_vec(),
            registrations: self.ledger.registrations().to_vec(),
            interested: self.ledger.interested().to_vec(),
            favorites: self.ledger.favorites().to_vec(),
        }
    }

    /// Edit an event, reconciling capacity against its current registrations
    pub fn edit_event(&mut self, id: &EventId, patch: &UpdateEventRequest) -> Result<Event> {
        let committed = self.ledger.committed_count(id);
        self.registry.edit(id, patch, committed)
    }

    /// Events whose seat counter disagrees with their registrations.
    /// Empty whenever the state was only changed through the engine.
    pub fn capacity_violations(&self) -> Vec<String> {
        self.registry
            .list()
            .iter()
            .filter_map(|event| {
                let committed = self.ledger.committed_count(&event.id);
                let consistent = event.remaining_seats <= event.capacity
                    && event.capacity - event.remaining_seats == committed;
                (!consistent).then(|| {
                    format!(
                        "event {}: capacity {} remaining {} registrations {}",
                        event.id, event.capacity, event.remaining_seats, committed
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateEventRequest, StudentSnapshot};
    use chrono::Utc;

    #[test]
    fn test_snapshot_round_trip_through_state() {
        let mut state = EngineState::default();
        let event = state
            .registry
            .create(
                CreateEventRequest {
                    title: "Quiz".into(),
                    description: "General quiz".into(),
                    venue: "Room 101".into(),
                    date: "2026-11-05".into(),
                    capacity: 3,
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        let student = StudentSnapshot {
            id: "s1".into(),
            name: "Sam".into(),
            email: "sam@campus.edu".into(),
            ..Default::default()
        };
        state.ledger.register(&mut state.registry, &event.id, student, Utc::now()).unwrap();

        let snapshot = state.snapshot();
        let restored = EngineState::from_snapshot(snapshot.clone());
        assert_eq!(restored.snapshot(), snapshot);
        assert!(restored.capacity_violations().is_empty());
    }

    #[test]
    fn test_capacity_violations_detects_drift() {
        let mut state = EngineState::default();
        let event = state
            .registry
            .create(
                CreateEventRequest {
                    title: "Quiz".into(),
                    description: "General quiz".into(),
                    venue: "Room 101".into(),
                    date: "2026-11-05".into(),
                    capacity: 3,
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        state.registry.get_mut(&event.id).unwrap().remaining_seats = 1;
        assert_eq!(state.capacity_violations().len(), 1);
    }
}
