//! Campus Events
//!
//! The event registration engine behind a campus event-management client.
//! Students browse events, register, mark interest and keep favorites;
//! administrators create, edit, postpone and cancel events. This library
//! owns those collections, enforces seat capacity across concurrent
//! actions, and persists everything to a key-value store.

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ActionResult, CampusEventsError, ErrorKind, Result};

// Re-export main components for easy access
pub use services::{EventEngine, ServiceFactory, SessionService};
pub use storage::PersistenceAdapter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
