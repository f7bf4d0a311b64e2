//! Input validation
//!
//! Pure predicate functions checking event, registration and sign-in input
//! before any state is mutated. Every check reports all violated fields,
//! not just the first one.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{CreateEventRequest, SignInRequest, StudentSnapshot, UpdateEventRequest};
use crate::utils::dates;

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.errors.clone()
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// True for missing or whitespace-only text
pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// Basic `local@domain.tld` shape check
pub fn is_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    });
    regex.is_match(email.trim())
}

pub fn is_positive(value: i64) -> bool {
    value > 0
}

fn check_capacity(errors: &mut ValidationErrors, capacity: i64) {
    if !is_positive(capacity) {
        errors.add("capacity", "Capacity must be a positive integer");
    } else if capacity > i64::from(u32::MAX) {
        errors.add("capacity", "Capacity is too large");
    }
}

fn check_date(errors: &mut ValidationErrors, date: &str) {
    if is_empty(date) {
        errors.add("date", "Date is required");
    } else if !dates::is_valid_date(date) {
        errors.add("date", "Date must be YYYY-MM-DD or an ISO-8601 timestamp");
    }
}

/// Validate a new event
pub fn validate_event(request: &CreateEventRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_empty(&request.title) {
        errors.add("title", "Title is required");
    }
    check_date(&mut errors, &request.date);
    if is_empty(&request.venue) {
        errors.add("venue", "Venue is required");
    }
    if is_empty(&request.description) {
        errors.add("description", "Description is required");
    }
    check_capacity(&mut errors, request.capacity);

    errors.into_result()
}

/// Validate the fields present in an event patch
pub fn validate_event_patch(patch: &UpdateEventRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if patch.title.as_deref().is_some_and(is_empty) {
        errors.add("title", "Title cannot be blank");
    }
    if let Some(date) = &patch.date {
        check_date(&mut errors, date);
    }
    if patch.venue.as_deref().is_some_and(is_empty) {
        errors.add("venue", "Venue cannot be blank");
    }
    if patch.description.as_deref().is_some_and(is_empty) {
        errors.add("description", "Description cannot be blank");
    }
    if let Some(capacity) = patch.capacity {
        check_capacity(&mut errors, capacity);
    }

    errors.into_result()
}

/// Validate a new date for a postponed event
pub fn validate_postpone_date(date: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_date(&mut errors, date);
    errors.into_result()
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    if is_empty(name) {
        errors.add("name", "Name is required");
    } else if name.trim().chars().count() < 2 {
        errors.add("name", "Name must be at least 2 characters");
    }
}

fn check_year(errors: &mut ValidationErrors, year: Option<u8>) {
    if let Some(year) = year {
        if !(1..=4).contains(&year) {
            errors.add("year", "Year must be between 1 and 4");
        }
    }
}

/// Validate a registration request: target event plus the student snapshot
pub fn validate_registration(event_id: &str, student: &StudentSnapshot) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_empty(event_id) {
        errors.add("eventId", "Event ID is required");
    }
    if is_empty(&student.id) {
        errors.add("studentId", "Student ID is required");
    }
    // Names derived from short emails may be a single letter; only require one.
    if is_empty(&student.name) {
        errors.add("name", "Name is required");
    }
    if !is_email(&student.email) {
        errors.add("email", "Invalid email");
    }
    check_year(&mut errors, student.year);

    errors.into_result()
}

/// Validate submitted sign-in fields
pub fn validate_sign_in(request: &SignInRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_empty(&request.email) {
        errors.add("email", "Email is required");
    } else if !is_email(&request.email) {
        errors.add("email", "Invalid email");
    }
    if request.password.is_empty() {
        errors.add("password", "Password is required");
    }
    if let Some(name) = &request.name {
        check_name(&mut errors, name);
    }
    check_year(&mut errors, request.year);

    errors.into_result()
}
