//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the crate.

use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Sanitize a storage key for use as a file name
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Canonical form of an email address, used as a student's stable id
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Display name derived from the local part of an email address
pub fn name_from_email(email: &str) -> String {
    let local = email.trim().split('@').next().unwrap_or_default();
    local
        .split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human readable seat availability, e.g. `3 of 40 seats left`
pub fn format_seats(remaining: u32, capacity: u32) -> String {
    if remaining == 0 {
        "Full".to_string()
    } else {
        format!("{} of {} seats left", remaining, capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("campus_events:events"), "campus_events_events");
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada.Lovelace@Campus.EDU "), "ada.lovelace@campus.edu");
    }

    #[test]
    fn test_name_from_email() {
        assert_eq!(name_from_email("ada.lovelace@campus.edu"), "Ada Lovelace");
        assert_eq!(name_from_email("grace_hopper-1@campus.edu"), "Grace Hopper 1");
    }

    #[test]
    fn test_format_seats() {
        assert_eq!(format_seats(0, 10), "Full");
        assert_eq!(format_seats(3, 40), "3 of 40 seats left");
    }
}
