//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from built-in defaults, TOML files and environment
//! variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment prefix; nested keys use `__`, e.g. `CAMPUS_EVENTS__STORAGE__BACKEND`
pub const ENV_PREFIX: &str = "CAMPUS_EVENTS";

/// Main application configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

/// Persistence configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding one JSON file per key (file backend)
    pub data_dir: String,
    pub redis_url: Option<String>,
    /// Prepended to every collection key
    pub key_prefix: String,
}

/// The single static admin credential
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily-rolling log files; stdout only when unset
    pub log_dir: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaTimeOrder {
    /// Parsed clock time, so "9:00 AM" precedes "10:00 AM"
    #[default]
    Chronological,
    /// Plain string comparison of the stored time text
    Lexical,
}

/// Feature flags configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub seed_default_events: bool,
    /// TOML file with `[[events]]` tables replacing the built-in baseline
    pub seed_file: Option<String>,
    pub agenda_time_order: AgendaTimeOrder,
}

impl Settings {
    /// Load settings from `config.toml` (if present) and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load settings from an explicit file, then environment variables
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    fn build<T>(file: T) -> Result<Self, config::ConfigError>
    where
        T: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CampusEventsError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::File,
                data_dir: "data".to_string(),
                redis_url: None,
                key_prefix: "campus_events:".to_string(),
            },
            admin: AdminConfig {
                email: "admin@campus.edu".to_string(),
                password: "admin123".to_string(),
                name: "Administrator".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                log_dir: None,
                json: false,
            },
            features: FeaturesConfig {
                seed_default_events: true,
                seed_file: None,
                agenda_time_order: AgendaTimeOrder::Chronological,
            },
        }
    }
}
