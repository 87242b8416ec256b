use std::fmt::Display;

use crate::error::{AppError, AppResult};
use crate::models::{DetailTier, MovieId};

pub mod memory;
pub mod redis;

mod macros;

pub use self::memory::MemoryStore;
pub use self::redis::{create_redis_client, RedisStore};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Metadata { id: MovieId, tier: DetailTier },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Metadata { id, tier } => write!(f, "meta:{}:{}", tier, id),
        }
    }
}

#[derive(Clone)]
enum Backend {
    Memory(MemoryStore),
    Redis(RedisStore),
}

/// Cache handle for storing and retrieving serialized values with a TTL
///
/// Values are stored as JSON so both backends behave the same way.
#[derive(Clone)]
pub struct Cache {
    backend: Backend,
}

/// Handle for gracefully shutting down a background cache writer
pub struct CacheWriterHandle {
    shutdown_tx: Option<tokio::sync::mpsc::Sender<()>>,
}

impl CacheWriterHandle {
    /// Initiates a graceful shutdown of the cache writer, if there is one
    pub async fn shutdown(self) {
        if let Some(tx) = self.shutdown_tx {
            let _ = tx.send(()).await;
            tracing::info!("Cache writer shutdown signal sent");
        }
    }
}

impl Cache {
    /// Creates a cache held in process memory
    pub fn in_memory() -> (Self, CacheWriterHandle) {
        let cache = Self {
            backend: Backend::Memory(MemoryStore::new()),
        };
        (cache, CacheWriterHandle { shutdown_tx: None })
    }

    /// Creates a Redis-backed cache with an async write background task
    pub fn redis(client: ::redis::Client) -> (Self, CacheWriterHandle) {
        let (store, shutdown_tx) = RedisStore::spawn(client);
        let cache = Self {
            backend: Backend::Redis(store),
        };
        (
            cache,
            CacheWriterHandle {
                shutdown_tx: Some(shutdown_tx),
            },
        )
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` when the key is absent or its TTL has elapsed.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let key = key.to_string();
        let cached = match &self.backend {
            Backend::Memory(store) => store.get(&key)?,
            Backend::Redis(store) => store.get(&key).await?,
        };

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Stores a value in the cache without blocking the caller
    ///
    /// Failures are logged and otherwise ignored.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        match &self.backend {
            Backend::Memory(store) => store.set(key.to_string(), json, ttl),
            Backend::Redis(store) => store.set_in_background(key.to_string(), json, ttl),
        }
    }
}
