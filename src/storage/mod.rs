//! Persistence module
//!
//! Durable key-value storage for the engine's collections and the session,
//! with memory, file and Redis backends.

pub mod adapter;
pub mod file;
pub mod redis_store;
pub mod store;

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::utils::errors::{CampusEventsError, Result};

pub use adapter::PersistenceAdapter;
pub use file::FileStore;
pub use redis_store::RedisStore;
pub use store::{KeyValueStore, MemoryStore};

/// Open the store selected by configuration
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::open(&config.data_dir).await?),
        StorageBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                CampusEventsError::Config("Redis URL is required for the redis backend".to_string())
            })?;
            let store = RedisStore::connect(url).await?;
            store.ping().await?;
            Arc::new(store)
        }
    };

    info!(backend = store.backend(), "Storage backend ready");
    Ok(store)
}

/// Open the configured store and wrap it in an adapter
pub async fn open_adapter(config: &StorageConfig) -> Result<PersistenceAdapter> {
    let store = open_store(config).await?;
    Ok(PersistenceAdapter::new(store, config.key_prefix.clone()))
}
