//! Event registration engine
//!
//! The single owner of events, registrations, interests and favorites.
//! Every mutation runs as one read-check-write unit under a mutex: the
//! in-memory state is updated first, then the full snapshot is written to
//! the persistence adapter before the lock is released, so writes land in
//! mutation order.
//!
//! A failed write is reported to the caller but does not roll back the
//! in-memory change; the next successful write or refresh reconciles.
//! When storage could not be read at all, writes are refused until a
//! refresh succeeds, so the empty fallback never replaces stored data.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use super::queries::{self, AgendaItem};
use crate::config::AgendaTimeOrder;
use crate::models::{
    CreateEventRequest, Event, EventId, EventStatus, FavoriteMarker, InterestMarker, ParticipationStatus,
    Registration, Snapshot, StudentSnapshot, UpdateEventRequest,
};
use crate::state::{seed, EngineState};
use crate::storage::PersistenceAdapter;
use crate::utils::dates;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::logging::{log_admin_action, log_event_action, log_registration_action};

/// Where baseline events come from at first hydration
#[derive(Debug, Clone, Default)]
pub enum SeedSource {
    /// No seeding
    None,
    /// The built-in baseline list
    #[default]
    Defaults,
    /// Events loaded from a seed file
    Events(Vec<Event>),
}

impl SeedSource {
    fn events(&self) -> Vec<Event> {
        match self {
            SeedSource::None => Vec::new(),
            SeedSource::Defaults => seed::default_events(),
            SeedSource::Events(events) => events.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub seed: SeedSource,
    pub agenda_time_order: AgendaTimeOrder,
}

/// Collection sizes, for start-up logging and admin dashboards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub events: usize,
    pub active_events: usize,
    pub cancelled_events: usize,
    pub registrations: usize,
    pub interested: usize,
    pub favorites: usize,
}

pub struct EventEngine {
    state: Mutex<EngineState>,
    persistence: PersistenceAdapter,
    loading: AtomicBool,
    /// Set once storage has been read successfully. Until then writes are
    /// refused so an empty fallback state never replaces stored data.
    hydrated: AtomicBool,
    options: EngineOptions,
}

impl EventEngine {
    /// Create an engine with empty state. It reports `is_loading()` until
    /// [`EventEngine::initialize`] completes.
    pub fn new(persistence: PersistenceAdapter, options: EngineOptions) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            persistence,
            loading: AtomicBool::new(true),
            hydrated: AtomicBool::new(false),
            options,
        }
    }

    /// Engine over a private in-memory store without seeding
    pub fn in_memory() -> Self {
        Self::new(
            PersistenceAdapter::in_memory(),
            EngineOptions {
                seed: SeedSource::None,
                ..Default::default()
            },
        )
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// First hydration from storage, followed by the seed-if-absent merge.
    /// Returns the number of baseline events added.
    pub async fn initialize(&self) -> Result<usize> {
        let mut state = self.state.lock().await;
        self.hydrate(&mut state).await;

        let added = state.registry.merge_missing(self.options.seed.events());
        if added > 0 {
            info!(added = added, "Seeded baseline events");
            if self.is_hydrated() {
                if let Err(e) = self.persist(&state).await {
                    warn!(error = %e, "Failed to persist seeded events");
                }
            } else {
                warn!(added = added, "Stored state unavailable, seeded events kept in memory only");
            }
        }

        self.loading.store(false, Ordering::SeqCst);
        Ok(added)
    }

    /// Replace in-memory state with what storage holds. No merge, no seeding.
    pub async fn refresh(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.loading.store(true, Ordering::SeqCst);
        self.hydrate(&mut state).await;
        self.loading.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Load failures degrade to empty collections so the engine stays usable.
    /// Such a fallback state is never written back; see [`EventEngine::is_hydrated`].
    async fn hydrate(&self, state: &mut MutexGuard<'_, EngineState>) {
        let snapshot = match self.persistence.load_all().await {
            Ok(snapshot) => {
                self.hydrated.store(true, Ordering::SeqCst);
                snapshot
            }
            Err(e) => {
                error!(error = %e, backend = self.persistence.backend(), "Failed to load stored state, starting empty");
                self.hydrated.store(false, Ordering::SeqCst);
                Snapshot::default()
            }
        };

        **state = EngineState::from_snapshot(snapshot);
        for violation in state.capacity_violations() {
            warn!(violation = %violation, "Stored seat counter disagrees with registrations");
        }
        debug!(
            events = state.registry.len(),
            registrations = state.ledger.registrations().len(),
            "State hydrated"
        );
    }

    /// Whether the last hydration read storage successfully
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::SeqCst)
    }

    async fn persist(&self, state: &EngineState) -> Result<()> {
        if !self.is_hydrated() {
            error!(backend = self.persistence.backend(), "Stored state was never loaded; refusing to overwrite it");
            return Err(CampusEventsError::Persistence(
                "stored state could not be loaded; refresh before saving".to_string(),
            ));
        }
        let snapshot = state.snapshot();
        if let Err(e) = self.persistence.save_all(&snapshot).await {
            error!(error = %e, backend = self.persistence.backend(), "Failed to save state; in-memory changes kept");
            return Err(e);
        }
        Ok(())
    }

    // Event registry

    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        let mut state = self.state.lock().await;
        let event = state.registry.create(request, Utc::now())?;
        log_event_action(event.id.as_str(), "create", Some(&event.title));
        self.persist(&state).await?;
        Ok(event)
    }

    pub async fn edit_event(&self, id: &EventId, patch: UpdateEventRequest) -> Result<Event> {
        let mut state = self.state.lock().await;
        let event = state.edit_event(id, &patch)?;
        log_event_action(id.as_str(), "edit", None);
        self.persist(&state).await?;
        Ok(event)
    }

    pub async fn postpone_event(&self, id: &EventId, new_date: &str) -> Result<Event> {
        let mut state = self.state.lock().await;
        let event = state.registry.postpone(id, new_date)?;
        log_event_action(id.as_str(), "postpone", Some(&event.date));
        self.persist(&state).await?;
        Ok(event)
    }

    /// Cancel an event. Cancelling twice is a no-op.
    pub async fn cancel_event(&self, id: &EventId) -> Result<Event> {
        let mut state = self.state.lock().await;
        let (event, changed) = state.registry.cancel(id)?;
        if changed {
            log_event_action(id.as_str(), "cancel", None);
            self.persist(&state).await?;
        } else {
            debug!(event_id = %id, "Event already cancelled");
        }
        Ok(event)
    }

    pub async fn get_event_by_id(&self, id: &EventId) -> Option<Event> {
        self.state.lock().await.registry.get(id).cloned()
    }

    /// All events in insertion order, cancelled ones included
    pub async fn list_events(&self) -> Vec<Event> {
        self.state.lock().await.registry.list().to_vec()
    }

    pub async fn list_events_by_date(&self) -> Vec<Event> {
        self.state.lock().await.registry.list_by_date()
    }

    // Registration ledger

    pub async fn register_for_event(&self, event_id: &EventId, student: StudentSnapshot) -> Result<Registration> {
        let mut state = self.state.lock().await;
        let state = &mut *state;
        let registration = state
            .ledger
            .register(&mut state.registry, event_id, student, Utc::now())?;
        log_registration_action(event_id.as_str(), &registration.student.id, "register");
        self.persist(state).await?;
        Ok(registration)
    }

    pub async fn unregister_from_event(&self, event_id: &EventId, student_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let state = &mut *state;
        state.ledger.unregister(&mut state.registry, event_id, student_id)?;
        log_registration_action(event_id.as_str(), student_id, "unregister");
        self.persist(state).await
    }

    /// Returns `false` when the student was already marked interested
    pub async fn mark_interested(&self, event_id: &EventId, student: StudentSnapshot) -> Result<bool> {
        let mut state = self.state.lock().await;
        let state = &mut *state;
        let student_id = student.id.clone();
        let added = state
            .ledger
            .mark_interested(&state.registry, event_id, student, Utc::now())?;
        if added {
            log_registration_action(event_id.as_str(), &student_id, "interest");
            self.persist(state).await?;
        }
        Ok(added)
    }

    /// Returns `false` when there was no interest to remove
    pub async fn remove_interest(&self, event_id: &EventId, student_id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let removed = state.ledger.remove_interest(event_id, student_id);
        if removed {
            log_registration_action(event_id.as_str(), student_id, "remove_interest");
            self.persist(&state).await?;
        }
        Ok(removed)
    }

    /// Returns the new favorite membership
    pub async fn toggle_favorite(&self, event_id: &EventId, student_id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let favorite = state.ledger.toggle_favorite(event_id, student_id, Utc::now());
        log_registration_action(
            event_id.as_str(),
            student_id,
            if favorite { "favorite" } else { "unfavorite" },
        );
        self.persist(&state).await?;
        Ok(favorite)
    }

    pub async fn is_favorite(&self, event_id: &EventId, student_id: &str) -> bool {
        self.state.lock().await.ledger.is_favorite(event_id, student_id)
    }

    pub async fn is_registered(&self, event_id: &EventId, student_id: &str) -> bool {
        self.state.lock().await.ledger.is_registered(event_id, student_id)
    }

    pub async fn is_interested(&self, event_id: &EventId, student_id: &str) -> bool {
        self.state.lock().await.ledger.is_interested(event_id, student_id)
    }

    // Query surface

    pub async fn get_participants(&self, event_id: &EventId) -> Vec<Registration> {
        queries::participants(&*self.state.lock().await, event_id)
    }

    pub async fn get_my_registered_events(&self, student_id: &str) -> Vec<Registration> {
        self.state.lock().await.ledger.registrations_for(student_id)
    }

    pub async fn get_my_interested_events(&self, student_id: &str) -> Vec<InterestMarker> {
        self.state.lock().await.ledger.interests_for(student_id)
    }

    pub async fn get_my_favorites(&self, student_id: &str) -> Vec<FavoriteMarker> {
        self.state.lock().await.ledger.favorites_for(student_id)
    }

    pub async fn get_favorite_events(&self, student_id: &str) -> Vec<Event> {
        queries::favorite_events(&*self.state.lock().await, student_id)
    }

    pub async fn get_my_events(&self, student_id: &str) -> Vec<(Event, ParticipationStatus)> {
        queries::my_events(&*self.state.lock().await, student_id)
    }

    pub async fn registration_status(&self, event_id: &EventId, student_id: &str) -> Option<ParticipationStatus> {
        queries::participation_status(&*self.state.lock().await, event_id, student_id)
    }

    /// The student's agenda for the current local date
    pub async fn today_agenda(&self, student_id: &str) -> Vec<AgendaItem> {
        self.agenda_for(student_id, dates::today()).await
    }

    pub async fn agenda_for(&self, student_id: &str, day: NaiveDate) -> Vec<AgendaItem> {
        let state = self.state.lock().await;
        queries::agenda_for_day(&state, student_id, day, self.options.agenda_time_order)
    }

    /// Owned copy of all four collections
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn stats(&self) -> EngineStats {
        let state = self.state.lock().await;
        let events = state.registry.list();
        let cancelled_events = events.iter().filter(|e| e.status == EventStatus::Cancelled).count();
        EngineStats {
            events: events.len(),
            active_events: events.len() - cancelled_events,
            cancelled_events,
            registrations: state.ledger.registrations().len(),
            interested: state.ledger.interested().len(),
            favorites: state.ledger.favorites().len(),
        }
    }

    /// Drop every collection from memory and storage
    pub async fn reset(&self, admin_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        *state = EngineState::default();
        log_admin_action(admin_id, "reset", None);
        self.persistence.clear_all().await?;
        self.hydrated.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl std::fmt::Debug for EventEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEngine")
            .field("persistence", &self.persistence)
            .field("loading", &self.is_loading())
            .field("hydrated", &self.is_hydrated())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
