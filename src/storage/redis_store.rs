//! Redis-backed store
//!
//! Keeps each collection blob as a plain Redis string with no expiry.

use futures::future::BoxFuture;
use redis::AsyncCommands;
use tracing::{debug, error};

use super::store::KeyValueStore;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct RedisStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    url: String,
}

impl RedisStore {
    /// Connect to the Redis server at `url`
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;
        debug!(url = %url, "Connected to Redis");

        Ok(Self {
            connection_manager,
            url: url.to_string(),
        })
    }

    /// Test Redis connection
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for RedisStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let mut conn = self.connection_manager.clone();
            match conn.get::<&str, Option<String>>(key).await {
                Ok(data) => {
                    debug!(key = %key, has_data = data.is_some(), "Redis GET result");
                    Ok(data)
                }
                Err(e) => {
                    error!(key = %key, error = %e, "Failed to read key from Redis");
                    Err(e.into())
                }
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut conn = self.connection_manager.clone();
            match conn.set::<_, _, ()>(key, value).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    error!(key = %key, error = %e, "Failed to write key to Redis");
                    Err(e.into())
                }
            }
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut conn = self.connection_manager.clone();
            let deleted: u32 = conn.del(key).await?;
            debug!(key = %key, deleted = deleted, "Redis DEL result");
            Ok(())
        })
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
