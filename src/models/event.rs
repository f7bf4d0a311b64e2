//! Event model

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Stable event identifier.
///
/// Serialized as a bare string so ids round-trip through storage unchanged.
/// Integer ids written by older clients are read as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EventIdVisitor;

        impl<'de> Visitor<'de> for EventIdVisitor {
            type Value = EventId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an event id string or integer")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<EventId, E> {
                Ok(EventId(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<EventId, E> {
                Ok(EventId(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<EventId, E> {
                Ok(EventId(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<EventId, E> {
                Ok(EventId(value.to_string()))
            }
        }

        deserializer.deserialize_any(EventIdVisitor)
    }
}

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Active,
    Cancelled,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Active => write!(f, "active"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub capacity: u32,
    pub remaining_seats: u32,
    #[serde(default)]
    pub status: EventStatus,
}

impl Event {
    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    pub fn is_full(&self) -> bool {
        self.remaining_seats == 0
    }

    /// Seats currently claimed by registrations
    pub fn committed_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.remaining_seats)
    }
}

/// Admin input for a new event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub venue: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Signed so out-of-range input reaches validation instead of failing to parse
    pub capacity: i64,
}

/// Partial update merged into an existing event.
///
/// Identity, status and seat bookkeeping are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub end_time: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub image: Option<String>,
    pub capacity: Option<i64>,
}

impl UpdateEventRequest {
    /// Merge every descriptive field present in the patch into `event`.
    /// Capacity is reconciled separately by the registry.
    pub fn apply_descriptive(&self, event: &mut Event) {
        fn merge(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn merge_opt(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        merge(&mut event.title, &self.title);
        merge(&mut event.description, &self.description);
        merge(&mut event.venue, &self.venue);
        merge(&mut event.date, &self.date);
        merge_opt(&mut event.time, &self.time);
        merge_opt(&mut event.end_time, &self.end_time);
        merge_opt(&mut event.event_type, &self.event_type);
        merge_opt(&mut event.contact_person, &self.contact_person);
        merge_opt(&mut event.contact_number, &self.contact_number);
        merge_opt(&mut event.image, &self.image);
    }
}
