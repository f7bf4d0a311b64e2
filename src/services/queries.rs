//! Derived read-only views
//!
//! Compositions of the registry and the ledger used by presentation code:
//! the daily agenda, rosters and per-student listings. Every function
//! returns owned data.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::AgendaTimeOrder;
use crate::models::{Event, EventId, ParticipationStatus, Registration};
use crate::state::EngineState;
use crate::utils::dates;

/// Placeholder shown for events without a start time
pub const TIME_TBA: &str = "TBA";

/// One entry of a student's agenda for a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaItem {
    pub event: Event,
    pub status: ParticipationStatus,
}

impl AgendaItem {
    pub fn display_time(&self) -> &str {
        self.event
            .time
            .as_deref()
            .filter(|time| !time.trim().is_empty())
            .unwrap_or(TIME_TBA)
    }
}

/// Events on `day` that the student registered for or marked interest in.
///
/// An event present in both lists appears once, as `Registered`. Items are
/// ordered by start time according to `order`; events without a time go last.
pub fn agenda_for_day(
    state: &EngineState,
    student_id: &str,
    day: NaiveDate,
    order: AgendaTimeOrder,
) -> Vec<AgendaItem> {
    let registered = state
        .ledger
        .registrations_for(student_id)
        .into_iter()
        .map(|r| (r.event_id, ParticipationStatus::Registered));
    let interested = state
        .ledger
        .interests_for(student_id)
        .into_iter()
        .map(|i| (i.event_id, ParticipationStatus::Interested));

    let mut seen: HashSet<EventId> = HashSet::new();
    let mut items: Vec<AgendaItem> = registered
        .chain(interested)
        .filter_map(|(event_id, status)| {
            let event = state.registry.get(&event_id)?;
            if !dates::is_same_day(&event.date, day) || !seen.insert(event_id) {
                return None;
            }
            Some(AgendaItem {
                event: event.clone(),
                status,
            })
        })
        .collect();

    items.sort_by(|a, b| compare_times(a.event.time.as_deref(), b.event.time.as_deref(), order));
    items
}

/// Agenda ordering of two optional start times.
///
/// Missing or blank times sort last. Chronological order ranks parseable
/// times by clock value ahead of unparseable text, which falls back to
/// string comparison; lexical order compares the raw text only.
pub fn compare_times(a: Option<&str>, b: Option<&str>, order: AgendaTimeOrder) -> Ordering {
    let a = a.map(str::trim).filter(|t| !t.is_empty());
    let b = b.map(str::trim).filter(|t| !t.is_empty());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match order {
            AgendaTimeOrder::Lexical => a.cmp(b),
            AgendaTimeOrder::Chronological => match (dates::parse_time(a), dates::parse_time(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.cmp(b),
            },
        },
    }
}

/// Registration records for an event, carrying each student's snapshot
pub fn participants(state: &EngineState, event_id: &EventId) -> Vec<Registration> {
    state.ledger.participants(event_id)
}

/// How the student relates to the event, registration taking precedence
pub fn participation_status(state: &EngineState, event_id: &EventId, student_id: &str) -> Option<ParticipationStatus> {
    if state.ledger.is_registered(event_id, student_id) {
        Some(ParticipationStatus::Registered)
    } else if state.ledger.is_interested(event_id, student_id) {
        Some(ParticipationStatus::Interested)
    } else {
        None
    }
}

/// Events the student registered for or is interested in, with status,
/// in the order the registry lists them
pub fn my_events(state: &EngineState, student_id: &str) -> Vec<(Event, ParticipationStatus)> {
    state
        .registry
        .list()
        .iter()
        .filter_map(|event| {
            participation_status(state, &event.id, student_id).map(|status| (event.clone(), status))
        })
        .collect()
}

/// Events the student has favorited that still exist
pub fn favorite_events(state: &EngineState, student_id: &str) -> Vec<Event> {
    state
        .ledger
        .favorites_for(student_id)
        .iter()
        .filter_map(|marker| state.registry.get(&marker.event_id).cloned())
        .collect()
}
