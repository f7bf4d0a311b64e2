//! Services module
//!
//! This module contains the engine, the session holder and the read-only
//! query surface, plus the factory that wires them to configured storage.

pub mod engine;
pub mod queries;
pub mod session;

pub use engine::{EngineOptions, EngineStats, EventEngine, SeedSource};
pub use queries::{AgendaItem, TIME_TBA};
pub use session::SessionService;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::state::seed;
use crate::storage::{self, PersistenceAdapter};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub engine: Arc<EventEngine>,
    pub session: Arc<SessionService>,
    pub settings: Settings,
}

impl ServiceFactory {
    /// Open the configured storage backend and build all services on it
    pub async fn new(settings: Settings) -> Result<Self> {
        let adapter = storage::open_adapter(&settings.storage).await?;
        let seed = resolve_seed(&settings).await?;
        Ok(Self::build(settings, adapter, seed))
    }

    /// Build services on an existing adapter, seeding from the built-in list
    /// when enabled
    pub fn with_adapter(settings: Settings, adapter: PersistenceAdapter) -> Self {
        let seed = if settings.features.seed_default_events {
            SeedSource::Defaults
        } else {
            SeedSource::None
        };
        Self::build(settings, adapter, seed)
    }

    fn build(settings: Settings, adapter: PersistenceAdapter, seed: SeedSource) -> Self {
        let options = EngineOptions {
            seed,
            agenda_time_order: settings.features.agenda_time_order,
        };
        let engine = Arc::new(EventEngine::new(adapter.clone(), options));
        let session = Arc::new(SessionService::new(adapter, settings.admin.clone()));

        Self {
            engine,
            session,
            settings,
        }
    }

    /// Hydrate the engine and restore the stored session
    pub async fn initialize(&self) -> Result<EngineStats> {
        let seeded = self.engine.initialize().await?;
        let user = self.session.restore().await;
        let stats = self.engine.stats().await;

        info!(
            seeded = seeded,
            events = stats.events,
            registrations = stats.registrations,
            signed_in = user.is_some(),
            "Services initialized"
        );
        Ok(stats)
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            engine_ready: !self.engine.is_loading(),
            signed_in: self.session.current_user().await.is_some(),
            storage_backend: format!("{:?}", self.settings.storage.backend).to_lowercase(),
        }
    }
}

/// Seed events as configured: a seed file, the built-in list, or none
async fn resolve_seed(settings: &Settings) -> Result<SeedSource> {
    if !settings.features.seed_default_events {
        return Ok(SeedSource::None);
    }

    match &settings.features.seed_file {
        Some(path) => {
            let events = seed::load_seed_file(path).await.map_err(|e| {
                warn!(path = %path, error = %e, "Failed to load seed file");
                e
            })?;
            info!(path = %path, count = events.len(), "Loaded seed events");
            Ok(SeedSource::Events(events))
        }
        None => Ok(SeedSource::Defaults),
    }
}

/// Service health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealthStatus {
    pub engine_ready: bool,
    pub signed_in: bool,
    pub storage_backend: String,
}
