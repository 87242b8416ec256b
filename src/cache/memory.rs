use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::error::{AppError, AppResult};

/// Expired entries are swept on insert once the map grows past this size
const PURGE_THRESHOLD: usize = 1024;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process key/value store with per-entry expiry
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live value for `key`, if any
    pub fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AppError::Internal("Memory cache lock poisoned".to_string()))?;

        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    /// Stores `value` under `key` for `ttl` seconds
    pub fn set(&self, key: String, value: String, ttl: u64) {
        let now = Instant::now();
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(_) => {
                tracing::error!("Memory cache lock poisoned, dropping write");
                return;
            }
        };

        if entries.len() >= PURGE_THRESHOLD {
            entries.retain(|_, entry| entry.expires_at > now);
        }

        entries.insert(
            key,
            Entry {
                value,
                expires_at: now + Duration::from_secs(ttl),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
