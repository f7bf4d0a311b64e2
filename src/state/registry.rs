//! Event registry
//!
//! Owns the canonical list of events in insertion order, assigns ids and
//! keeps the per-event seat counter consistent on edits.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::{CreateEventRequest, Event, EventId, EventStatus, UpdateEventRequest};
use crate::utils::dates;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::helpers::generate_uuid;
use crate::utils::validation::{self, ValidationErrors};

#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    events: Vec<Event>,
    /// Highest numeric id handed out or hydrated; ids are never reused
    last_id: i64,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        let last_id = events
            .iter()
            .filter_map(|event| event.id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { events, last_id }
    }

    /// Next id: the creation timestamp in milliseconds, bumped past any id
    /// already issued so two events created in the same millisecond differ.
    /// Once the numeric range is used up, ids fall back to random UUIDs.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> EventId {
        let Some(floor) = self.last_id.checked_add(1) else {
            warn!(last_id = self.last_id, "Numeric event ids exhausted, issuing a UUID");
            return EventId(generate_uuid());
        };
        let candidate = now.timestamp_millis().max(floor);
        self.last_id = candidate;
        EventId(candidate.to_string())
    }

    /// Validate and append a new active event with every seat open
    pub fn create(&mut self, request: CreateEventRequest, now: DateTime<Utc>) -> Result<Event> {
        validation::validate_event(&request)?;
        let id = self.next_id(now);
        let event = build_event(id, request)?;
        self.events.push(event.clone());
        debug!(event_id = %event.id, capacity = event.capacity, "Event created");
        Ok(event)
    }

    /// Merge `patch` into the event.
    ///
    /// A capacity change keeps the `committed` registrations: it is rejected
    /// when the new capacity would be smaller, otherwise the remaining seats
    /// become `new_capacity - committed`.
    pub fn edit(&mut self, id: &EventId, patch: &UpdateEventRequest, committed: u32) -> Result<Event> {
        let event = self.get_mut(id)?;
        validation::validate_event_patch(patch)?;

        if let Some(capacity) = patch.capacity {
            let capacity = to_capacity(capacity)?;
            if capacity < committed {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "capacity",
                    format!("Capacity cannot be lower than the {} seats already registered", committed),
                );
                return Err(errors.into());
            }
            event.capacity = capacity;
            event.remaining_seats = capacity - committed;
        }
        patch.apply_descriptive(event);

        Ok(event.clone())
    }

    /// Move the event to `new_date`; nothing else changes
    pub fn postpone(&mut self, id: &EventId, new_date: &str) -> Result<Event> {
        let event = self.get_mut(id)?;
        validation::validate_postpone_date(new_date)?;
        event.date = new_date.trim().to_string();
        Ok(event.clone())
    }

    /// Mark the event cancelled. Returns the event and whether its status changed.
    pub fn cancel(&mut self, id: &EventId) -> Result<(Event, bool)> {
        let event = self.get_mut(id)?;
        let changed = event.status != EventStatus::Cancelled;
        event.status = EventStatus::Cancelled;
        Ok((event.clone(), changed))
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn get_mut(&mut self, id: &EventId) -> Result<&mut Event> {
        self.events
            .iter_mut()
            .find(|event| &event.id == id)
            .ok_or_else(|| CampusEventsError::EventNotFound { event_id: id.to_string() })
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.get(id).is_some()
    }

    /// All events, insertion order, cancelled ones included
    pub fn list(&self) -> &[Event] {
        &self.events
    }

    /// Events ordered by date, then parsed start time
    pub fn list_by_date(&self) -> Vec<Event> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| {
            dates::compare_dates(&a.date, &b.date).then_with(|| {
                let a_time = a.time.as_deref().and_then(dates::parse_time);
                let b_time = b.time.as_deref().and_then(dates::parse_time);
                match (a_time, b_time) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            })
        });
        events
    }

    /// Append every event whose id is not present yet. Returns how many were added.
    pub fn merge_missing(&mut self, candidates: Vec<Event>) -> usize {
        let mut added = 0;
        for event in candidates {
            if self.contains(&event.id) {
                continue;
            }
            if let Ok(numeric) = event.id.as_str().parse::<i64>() {
                self.last_id = self.last_id.max(numeric);
            }
            self.events.push(event);
            added += 1;
        }
        added
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn to_capacity(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add("capacity", "Capacity must be a positive integer");
        errors.into()
    })
}

/// Build an active event with all seats open from validated input
pub(crate) fn build_event(id: EventId, request: CreateEventRequest) -> Result<Event> {
    let capacity = to_capacity(request.capacity)?;
    Ok(Event {
        id,
        title: request.title.trim().to_string(),
        description: request.description,
        venue: request.venue,
        date: request.date.trim().to_string(),
        time: request.time,
        end_time: request.end_time,
        event_type: request.event_type,
        contact_person: request.contact_person,
        contact_number: request.contact_number,
        image: request.image,
        capacity,
        remaining_seats: capacity,
        status: EventStatus::Active,
    })
}
