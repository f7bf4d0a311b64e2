//! Test data helpers for creating students and event requests

use chrono::NaiveDate;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use campus_events::models::{CreateEventRequest, StudentSnapshot};
use campus_events::utils::helpers::normalize_email;

/// Student with a generated name and email; the id is the normalized email
pub fn fake_student() -> StudentSnapshot {
    let email: String = SafeEmail().fake();
    let name: String = Name().fake();
    StudentSnapshot {
        id: normalize_email(&email),
        name,
        email,
        roll_number: Some(format!("R{:05}", (0..100_000u32).fake::<u32>())),
        branch: Some("CSE".to_string()),
        year: Some((1..=4u8).fake::<u8>()),
    }
}

/// Student with a fixed id, for assertions that need to name them
pub fn student(id: &str) -> StudentSnapshot {
    StudentSnapshot {
        id: id.to_string(),
        name: format!("Student {}", id),
        email: format!("{}@campus.edu", id),
        roll_number: None,
        branch: Some("ECE".to_string()),
        year: Some(2),
    }
}

/// A valid create request for the given date and capacity
pub fn event_request(title: &str, date: &str, capacity: i64) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        description: format!("{} description", title),
        venue: "Seminar Hall".to_string(),
        date: date.to_string(),
        capacity,
        ..Default::default()
    }
}

/// A valid create request with a start time
pub fn timed_event_request(title: &str, date: &str, time: &str) -> CreateEventRequest {
    CreateEventRequest {
        time: Some(time.to_string()),
        ..event_request(title, date, 50)
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("Invalid test date")
}
