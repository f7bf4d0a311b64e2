//! Error handling for the campus events engine
//!
//! This module defines the main error type used throughout the crate,
//! its classification into error kinds, and the discriminated result
//! handed to the presentation layer.

use std::collections::BTreeMap;
use serde::Serialize;
use thiserror::Error;

use crate::utils::validation::ValidationErrors;

/// Main error type for the campus events engine
#[derive(Error, Debug)]
pub enum CampusEventsError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },

    #[error("No registration for student {student_id} on event {event_id}")]
    RegistrationNotFound { event_id: String, student_id: String },

    #[error("Event is full: {event_id}")]
    EventFull { event_id: String },

    #[error("Student {student_id} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: String, student_id: String },

    #[error("Event {event_id} is {status} and does not accept registrations")]
    EventNotActive { event_id: String, status: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Seed file error: {0}")]
    SeedFile(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, CampusEventsError>;

/// Coarse error classification surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    CapacityExceeded,
    Duplicate,
    InvalidState,
    Persistence,
    Authentication,
    Permission,
    Configuration,
}

impl CampusEventsError {
    /// Map the error onto its kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            CampusEventsError::Validation(_) | CampusEventsError::InvalidInput(_) => ErrorKind::Validation,
            CampusEventsError::EventNotFound { .. } => ErrorKind::NotFound,
            CampusEventsError::RegistrationNotFound { .. } => ErrorKind::NotFound,
            CampusEventsError::EventFull { .. } => ErrorKind::CapacityExceeded,
            CampusEventsError::AlreadyRegistered { .. } => ErrorKind::Duplicate,
            CampusEventsError::EventNotActive { .. } => ErrorKind::InvalidState,
            CampusEventsError::Persistence(_)
            | CampusEventsError::Serialization(_)
            | CampusEventsError::Io(_)
            | CampusEventsError::Redis(_) => ErrorKind::Persistence,
            CampusEventsError::SeedFile(_) | CampusEventsError::Config(_) => ErrorKind::Configuration,
            CampusEventsError::Authentication(_) => ErrorKind::Authentication,
            CampusEventsError::PermissionDenied(_) => ErrorKind::Permission,
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Configuration)
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::Configuration => ErrorSeverity::Critical,
            ErrorKind::Persistence => ErrorSeverity::Error,
            ErrorKind::Authentication | ErrorKind::Permission => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }

    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Persistence => "Failed to save changes".to_string(),
            ErrorKind::CapacityExceeded => "Event full or not found".to_string(),
            _ => self.to_string(),
        }
    }

    /// Field-level details for validation failures
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CampusEventsError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CampusEventsError {
    fn from(errors: ValidationErrors) -> Self {
        CampusEventsError::Validation(errors)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Discriminated outcome of an operation, as consumed by presentation code.
///
/// Never carries a panic or an unhandled error across the boundary: every
/// engine `Result` folds into one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: Option<String>,
    pub kind: Option<ErrorKind>,
    pub field_errors: BTreeMap<String, String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            kind: None,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn failure(error: &CampusEventsError) -> Self {
        Self {
            success: false,
            message: Some(error.user_message()),
            kind: Some(error.kind()),
            field_errors: error
                .field_errors()
                .map(|errors| errors.to_map())
                .unwrap_or_default(),
        }
    }

    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::failure(e),
        }
    }
}

impl<T> From<Result<T>> for ActionResult {
    fn from(result: Result<T>) -> Self {
        Self::from_result(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let full = CampusEventsError::EventFull { event_id: "1".into() };
        assert_eq!(full.kind(), ErrorKind::CapacityExceeded);

        let dup = CampusEventsError::AlreadyRegistered { event_id: "1".into(), student_id: "s".into() };
        assert_eq!(dup.kind(), ErrorKind::Duplicate);

        let io = CampusEventsError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.kind(), ErrorKind::Persistence);
        assert_eq!(io.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_action_result_from_persistence_failure() {
        let result: Result<()> = Err(CampusEventsError::Persistence("write failed".into()));
        let action = ActionResult::from(result);
        assert!(!action.success);
        assert_eq!(action.kind, Some(ErrorKind::Persistence));
        assert_eq!(action.message.as_deref(), Some("Failed to save changes"));
    }

    #[test]
    fn test_action_result_keeps_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        errors.add("venue", "Venue is required");
        let action = ActionResult::failure(&CampusEventsError::Validation(errors));
        assert_eq!(action.kind, Some(ErrorKind::Validation));
        assert_eq!(action.field_errors.len(), 2);
        assert_eq!(action.field_errors["title"], "Title is required");
    }

    #[test]
    fn test_action_result_ok() {
        let action = ActionResult::from(Ok::<u32, CampusEventsError>(3));
        assert!(action.success);
        assert!(action.message.is_none());
    }
}
