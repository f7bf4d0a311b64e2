//! Data models module
//!
//! This module contains all data structures owned by the engine and the
//! shapes they are persisted in.

pub mod event;
pub mod registration;
pub mod user;

use serde::{Deserialize, Serialize};

pub use event::{CreateEventRequest, Event, EventId, EventStatus, UpdateEventRequest};
pub use registration::{FavoriteMarker, InterestMarker, ParticipationStatus, Registration, StudentSnapshot};
pub use user::{SignInRequest, User};

/// The four collections persisted together after every mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub registrations: Vec<Registration>,
    pub interested: Vec<InterestMarker>,
    pub favorites: Vec<FavoriteMarker>,
}
