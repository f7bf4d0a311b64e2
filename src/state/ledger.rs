//! Registration ledger
//!
//! Owns registrations (hard seat claims), interest markers and favorites.
//! Seat accounting happens here, against the registry passed in by the
//! caller, so the check and the decrement are one step.

use chrono::{DateTime, Utc};

use super::registry::EventRegistry;
use crate::models::{EventId, FavoriteMarker, InterestMarker, Registration, StudentSnapshot};
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::validation;

#[derive(Debug, Clone, Default)]
pub struct RegistrationLedger {
    registrations: Vec<Registration>,
    interested: Vec<InterestMarker>,
    favorites: Vec<FavoriteMarker>,
}

impl RegistrationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        registrations: Vec<Registration>,
        interested: Vec<InterestMarker>,
        favorites: Vec<FavoriteMarker>,
    ) -> Self {
        Self {
            registrations,
            interested,
            favorites,
        }
    }

    /// Claim a seat for `student`.
    ///
    /// Checked in order: the event exists, it is active, the student holds no
    /// registration for it yet, and a seat is open.
    pub fn register(
        &mut self,
        registry: &mut EventRegistry,
        event_id: &EventId,
        student: StudentSnapshot,
        now: DateTime<Utc>,
    ) -> Result<Registration> {
        validation::validate_registration(event_id.as_str(), &student)?;

        let event = registry.get_mut(event_id)?;
        if !event.is_active() {
            return Err(CampusEventsError::EventNotActive {
                event_id: event_id.to_string(),
                status: event.status.to_string(),
            });
        }
        if self.is_registered(event_id, &student.id) {
            return Err(CampusEventsError::AlreadyRegistered {
                event_id: event_id.to_string(),
                student_id: student.id,
            });
        }
        if event.remaining_seats == 0 {
            return Err(CampusEventsError::EventFull { event_id: event_id.to_string() });
        }

        event.remaining_seats -= 1;
        let registration = Registration {
            event_id: event_id.clone(),
            student,
            registered_at: now,
        };
        self.registrations.push(registration.clone());
        Ok(registration)
    }

    /// Release the student's seat. The freed seat never pushes the counter
    /// above the event's capacity.
    pub fn unregister(
        &mut self,
        registry: &mut EventRegistry,
        event_id: &EventId,
        student_id: &str,
    ) -> Result<Registration> {
        let index = self
            .registrations
            .iter()
            .position(|registration| registration.matches(event_id, student_id))
            .ok_or_else(|| CampusEventsError::RegistrationNotFound {
                event_id: event_id.to_string(),
                student_id: student_id.to_string(),
            })?;
        let removed = self.registrations.remove(index);

        if let Ok(event) = registry.get_mut(event_id) {
            event.remaining_seats = event.remaining_seats.saturating_add(1).min(event.capacity);
        }
        Ok(removed)
    }

    /// Record interest. Returns `false` when the marker already existed.
    pub fn mark_interested(
        &mut self,
        registry: &EventRegistry,
        event_id: &EventId,
        student: StudentSnapshot,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if validation::is_empty(&student.id) {
            return Err(CampusEventsError::InvalidInput("Student ID is required".to_string()));
        }
        if !registry.contains(event_id) {
            return Err(CampusEventsError::EventNotFound { event_id: event_id.to_string() });
        }
        if self.is_interested(event_id, &student.id) {
            return Ok(false);
        }

        self.interested.push(InterestMarker {
            event_id: event_id.clone(),
            student,
            marked_at: Some(now),
        });
        Ok(true)
    }

    /// Drop interest. Returns `false` when there was nothing to remove.
    pub fn remove_interest(&mut self, event_id: &EventId, student_id: &str) -> bool {
        let before = self.interested.len();
        self.interested.retain(|marker| !marker.matches(event_id, student_id));
        self.interested.len() != before
    }

    /// Flip favorite membership. Returns the new membership.
    pub fn toggle_favorite(&mut self, event_id: &EventId, student_id: &str, now: DateTime<Utc>) -> bool {
        if let Some(index) = self
            .favorites
            .iter()
            .position(|marker| marker.matches(event_id, student_id))
        {
            self.favorites.remove(index);
            false
        } else {
            self.favorites.push(FavoriteMarker {
                event_id: event_id.clone(),
                student_id: student_id.to_string(),
                favorited_at: Some(now),
            });
            true
        }
    }

    pub fn is_registered(&self, event_id: &EventId, student_id: &str) -> bool {
        self.registrations.iter().any(|r| r.matches(event_id, student_id))
    }

    pub fn is_interested(&self, event_id: &EventId, student_id: &str) -> bool {
        self.interested.iter().any(|i| i.matches(event_id, student_id))
    }

    pub fn is_favorite(&self, event_id: &EventId, student_id: &str) -> bool {
        self.favorites.iter().any(|f| f.matches(event_id, student_id))
    }

    /// Number of registrations holding a seat on `event_id`
    pub fn committed_count(&self, event_id: &EventId) -> u32 {
        let count = self.registrations.iter().filter(|r| &r.event_id == event_id).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn interested(&self) -> &[InterestMarker] {
        &self.interested
    }

    pub fn favorites(&self) -> &[FavoriteMarker] {
        &self.favorites
    }

    pub fn participants(&self, event_id: &EventId) -> Vec<Registration> {
        self.registrations
            .iter()
            .filter(|r| &r.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn registrations_for(&self, student_id: &str) -> Vec<Registration> {
        self.registrations
            .iter()
            .filter(|r| r.student.id == student_id)
            .cloned()
            .collect()
    }

    pub fn interests_for(&self, student_id: &str) -> Vec<InterestMarker> {
        self.interested
            .iter()
            .filter(|i| i.student.id == student_id)
            .cloned()
            .collect()
    }

    pub fn favorites_for(&self, student_id: &str) -> Vec<FavoriteMarker> {
        self.favorites
            .iter()
            .filter(|f| f.student_id == student_id)
            .cloned()
            .collect()
    }
}
