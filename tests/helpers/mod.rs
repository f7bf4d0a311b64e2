//! Test helpers module
//!
//! Builders for students and events, a store whose writes can be made to
//! fail, and one-time test logging setup.

#![allow(dead_code)]

pub mod failing_store;
pub mod test_data;

pub use failing_store::*;
pub use test_data::*;

use std::sync::{Arc, Once};

use campus_events::services::{EngineOptions, EventEngine, SeedSource};
use campus_events::storage::{KeyValueStore, PersistenceAdapter};

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Initialized engine over a fresh in-memory store, without seeding
pub async fn empty_engine() -> EventEngine {
    init_test_logging();
    let engine = EventEngine::in_memory();
    engine.initialize().await.expect("Failed to initialize engine");
    engine
}

/// Engine over the given store, without seeding and not yet initialized
pub fn engine_on(store: Arc<dyn KeyValueStore>) -> EventEngine {
    seeded_engine_on(store, SeedSource::None)
}

/// Engine over the given store with the given seed source, not yet initialized
pub fn seeded_engine_on(store: Arc<dyn KeyValueStore>, seed: SeedSource) -> EventEngine {
    init_test_logging();
    EventEngine::new(
        PersistenceAdapter::new(store, "test:"),
        EngineOptions {
            seed,
            ..Default::default()
        },
    )
}
