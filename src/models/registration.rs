//! Registration, interest and favorite records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::EventId;

/// Student details copied into a record at the time it is created.
/// Later profile changes do not rewrite historical records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSnapshot {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u8>,
}

/// A committed seat claim, unique per (event, student)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub event_id: EventId,
    pub student: StudentSnapshot,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn matches(&self, event_id: &EventId, student_id: &str) -> bool {
        &self.event_id == event_id && self.student.id == student_id
    }
}

/// Soft signal of intent; no effect on seats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestMarker {
    pub event_id: EventId,
    pub student: StudentSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_at: Option<DateTime<Utc>>,
}

impl InterestMarker {
    pub fn matches(&self, event_id: &EventId, student_id: &str) -> bool {
        &self.event_id == event_id && self.student.id == student_id
    }
}

/// Bookmark toggled on and off by a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMarker {
    pub event_id: EventId,
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorited_at: Option<DateTime<Utc>>,
}

impl FavoriteMarker {
    pub fn matches(&self, event_id: &EventId, student_id: &str) -> bool {
        &self.event_id == event_id && self.student_id == student_id
    }
}

/// How a student relates to a given event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipationStatus {
    Registered,
    Interested,
}

impl std::fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipationStatus::Registered => write!(f, "Registered"),
            ParticipationStatus::Interested => write!(f, "Interested"),
        }
    }
}
