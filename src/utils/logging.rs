//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! helpers for the engine's mutations.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{CampusEventsError, Result};

/// Initialize logging based on configuration.
///
/// When a log directory is configured, the returned guard must be held for
/// the lifetime of the process so the file writer keeps flushing.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| CampusEventsError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "campus-events.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CampusEventsError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log event management actions
pub fn log_event_action(event_id: &str, action: &str, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        details = details,
        "Event action performed"
    );
}

/// Log registration, interest and favorite changes
pub fn log_registration_action(event_id: &str, student_id: &str, action: &str) {
    info!(
        event_id = event_id,
        student_id = student_id,
        action = action,
        "Registration action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: &str, action: &str, target: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        subject = target,
        "Admin action performed"
    );
}

/// Log storage reads and writes
pub fn log_persistence_operation(operation: &str, keys: usize, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            keys = keys,
            duration_ms = duration_ms,
            "Persistence operation completed"
        );
    } else {
        error!(
            operation = operation,
            keys = keys,
            duration_ms = duration_ms,
            "Persistence operation failed"
        );
    }
}
