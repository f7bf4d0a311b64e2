//! Persistence adapter
//!
//! Maps the engine's four collections and the session user onto named keys
//! of a [`KeyValueStore`]. Each collection is serialized independently as a
//! JSON blob.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::store::{KeyValueStore, MemoryStore};
use crate::models::{Snapshot, User};
use crate::utils::errors::Result;
use crate::utils::logging::log_persistence_operation;

pub const EVENTS_KEY: &str = "events";
pub const REGISTRATIONS_KEY: &str = "registrations";
pub const INTERESTED_KEY: &str = "interested";
pub const FAVORITES_KEY: &str = "favorites";
pub const SESSION_KEY: &str = "currentUser";

/// Suffix of the key that holds a blob which failed to decode
pub const BACKUP_SUFFIX: &str = ".corrupt";

pub const COLLECTION_KEYS: [&str; 4] = [EVENTS_KEY, REGISTRATIONS_KEY, INTERESTED_KEY, FAVORITES_KEY];

#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Adapter over a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), "")
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Full storage key for a collection name
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn backup_key(&self, name: &str) -> String {
        format!("{}{}", self.key(name), BACKUP_SUFFIX)
    }

    /// Read all four collections. Absent keys yield empty collections and
    /// undecodable blobs are copied to [`PersistenceAdapter::backup_key`]
    /// and treated as absent. A failing store read or backup write is
    /// reported as an error.
    pub async fn load_all(&self) -> Result<Snapshot> {
        let started = Instant::now();
        let result = self.read_snapshot().await;

        log_persistence_operation("load_all", COLLECTION_KEYS.len(), elapsed_ms(started), result.is_ok());
        result
    }

    /// Write all four collections
    pub async fn save_all(&self, snapshot: &Snapshot) -> Result<()> {
        let started = Instant::now();
        let result = self.write_snapshot(snapshot).await;

        log_persistence_operation("save_all", COLLECTION_KEYS.len(), elapsed_ms(started), result.is_ok());
        result
    }

    /// Remove all four collections
    pub async fn clear_all(&self) -> Result<()> {
        for name in COLLECTION_KEYS {
            self.store.delete(&self.key(name)).await?;
        }
        debug!(backend = self.backend(), "Cleared stored collections");
        Ok(())
    }

    pub async fn load_session(&self) -> Result<Option<User>> {
        self.load_value(SESSION_KEY).await
    }

    pub async fn save_session(&self, user: &User) -> Result<()> {
        self.save_value(SESSION_KEY, user).await
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.store.delete(&self.key(SESSION_KEY)).await
    }

    async fn read_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            events: self.load_collection(EVENTS_KEY).await?,
            registrations: self.load_collection(REGISTRATIONS_KEY).await?,
            interested: self.load_collection(INTERESTED_KEY).await?,
            favorites: self.load_collection(FAVORITES_KEY).await?,
        })
    }

    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.save_value(EVENTS_KEY, &snapshot.events).await?;
        self.save_value(REGISTRATIONS_KEY, &snapshot.registrations).await?;
        self.save_value(INTERESTED_KEY, &snapshot.interested).await?;
        self.save_value(FAVORITES_KEY, &snapshot.favorites).await
    }

    async fn load_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        Ok(self.load_value(name).await?.unwrap_or_default())
    }

    async fn load_value<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let key = self.key(name);
        let Some(blob) = self.store.get(&key).await? else {
            debug!(key = %key, "No stored value");
            return Ok(None);
        };

        match serde_json::from_str(&blob) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // The next save replaces this key, so keep the raw blob aside first.
                let backup = self.backup_key(name);
                self.store.set(&backup, blob).await?;
                warn!(key = %key, backup = %backup, error = %e, "Stored value could not be decoded, backed it up and ignoring it");
                Ok(None)
            }
        }
    }

    async fn save_value<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let blob = serde_json::to_string(value)?;
        self.store.set(&self.key(name), blob).await
    }
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("backend", &self.store.backend())
            .field("prefix", &self.prefix)
            .finish()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
