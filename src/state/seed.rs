//! Baseline events
//!
//! A fixed set of campus events injected at first hydration when their ids
//! are missing. User-created events are never touched.

use std::path::Path;

use serde::Deserialize;

use super::registry::build_event;
use crate::models::{CreateEventRequest, Event, EventId};
use crate::utils::errors::Result;
use crate::utils::validation;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    events: Vec<SeedEvent>,
}

#[derive(Debug, Deserialize)]
struct SeedEvent {
    id: String,
    #[serde(flatten)]
    request: CreateEventRequest,
}

/// Built-in baseline events
pub fn default_events() -> Vec<Event> {
    let seeds = [
        (
            "seed-tech-fest",
            "Annual Tech Fest",
            "Project showcases, coding contests and hardware demos from every department.",
            "Main Auditorium",
            "2026-11-14",
            "10:00 AM",
            "Technical",
            120,
        ),
        (
            "seed-career-fair",
            "Career Fair",
            "Meet recruiters from partner companies and bring printed resumes.",
            "Convention Centre",
            "2026-11-21",
            "9:30 AM",
            "Career",
            200,
        ),
        (
            "seed-cultural-night",
            "Cultural Night",
            "Music, dance and drama performances by student clubs.",
            "Open Air Theatre",
            "2026-12-05",
            "6:00 PM",
            "Cultural",
            300,
        ),
        (
            "seed-ml-workshop",
            "Machine Learning Workshop",
            "Hands-on introduction to model training. Bring a laptop.",
            "Computer Lab 2",
            "2026-12-12",
            "2:00 PM",
            "Workshop",
            40,
        ),
    ];

    seeds
        .into_iter()
        .filter_map(|(id, title, description, venue, date, time, kind, capacity)| {
            let request = CreateEventRequest {
                title: title.to_string(),
                description: description.to_string(),
                venue: venue.to_string(),
                date: date.to_string(),
                time: Some(time.to_string()),
                event_type: Some(kind.to_string()),
                contact_person: Some("Student Affairs Office".to_string()),
                capacity,
                ..Default::default()
            };
            build_event(EventId::from(id), request).ok()
        })
        .collect()
}

/// Parse baseline events from TOML text with one `[[events]]` table per event
pub fn parse_seed_events(text: &str) -> Result<Vec<Event>> {
    let file: SeedFile = toml::from_str(text)?;
    file.events
        .into_iter()
        .map(|seed| {
            validation::validate_event(&seed.request)?;
            build_event(EventId(seed.id), seed.request)
        })
        .collect()
}

/// Load baseline events from a TOML file
pub async fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<Event>> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_seed_events(&text)
}
