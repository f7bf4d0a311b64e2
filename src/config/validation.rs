//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{CampusEventsError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_storage_config(&settings.storage)?;
    validate_admin_config(&settings.admin)?;
    validate_logging_config(&settings.logging)?;
    validate_features_config(&settings.features)?;

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.key_prefix.is_empty() {
        return Err(CampusEventsError::Config(
            "Storage key prefix is required".to_string()
        ));
    }

    match config.backend {
        StorageBackend::File if config.data_dir.trim().is_empty() => {
            Err(CampusEventsError::Config(
                "Data directory is required for the file backend".to_string()
            ))
        }
        StorageBackend::Redis if config.redis_url.as_deref().map_or(true, str::is_empty) => {
            Err(CampusEventsError::Config(
                "Redis URL is required for the redis backend".to_string()
            ))
        }
        _ => Ok(()),
    }
}

/// Validate admin credential configuration
fn validate_admin_config(config: &super::AdminConfig) -> Result<()> {
    if config.email.trim().is_empty() {
        return Err(CampusEventsError::Config(
            "Admin email is required".to_string()
        ));
    }

    if config.password.is_empty() {
        return Err(CampusEventsError::Config(
            "Admin password is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusEventsError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusEventsError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

fn validate_features_config(config: &super::FeaturesConfig) -> Result<()> {
    if config.seed_file.as_deref().is_some_and(|path| path.trim().is_empty()) {
        return Err(CampusEventsError::Config(
            "Seed file path cannot be blank".to_string()
        ));
    }

    Ok(())
}
