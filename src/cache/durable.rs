//! Durable Store Module
//!
//! Namespaced TTL store over a `StorageBackend`: the slow, long-lived layer.
//!
//! Durability is best-effort. Storage failures are logged and turned into
//! no-ops or misses, and entries that no longer parse are deleted.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::clock::{system_clock, SharedClock};
use crate::cache::entry::resolve_ttl;
use crate::cache::{CacheEntry, DurableStats, StorageBackend};
use crate::error::StorageError;

// == Durable Store ==
pub struct DurableStore<V> {
    backend: Arc<dyn StorageBackend>,
    prefix: String,
    default_ttl: Duration,
    clock: SharedClock,
    _value: PhantomData<fn() -> V>,
}

impl<V> DurableStore<V>
where
    V: Serialize + DeserializeOwned,
{
    // == Constructor ==
    /// Creates a store writing under `prefix` in `backend`.
    pub fn new(backend: Arc<dyn StorageBackend>, prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self::with_clock(backend, prefix, default_ttl, system_clock())
    }

    pub fn with_clock(
        backend: Arc<dyn StorageBackend>,
        prefix: impl Into<String>,
        default_ttl: Duration,
        clock: SharedClock,
    ) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            default_ttl,
            clock,
            _value: PhantomData,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Set ==
    /// Serializes and writes an entry. Failures are logged and ignored.
    pub fn set(&self, key: &str, value: &V, ttl: Option<Duration>) {
        let now = self.clock.now_ms();
        let entry = CacheEntry::new(value, resolve_ttl(ttl, self.default_ttl), now);

        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key, error = %err, "failed to serialize durable cache entry");
                return;
            }
        };

        if let Err(err) = self.backend.set_item(&self.storage_key(key), &payload) {
            warn!(key, error = %err, "failed to write durable cache entry");
        }
    }

    // == Get Entry ==
    /// Reads the full entry if present, parseable and unexpired.
    ///
    /// Expired or unparseable entries are removed.
    pub fn get_entry(&self, key: &str) -> Option<CacheEntry<V>> {
        let storage_key = self.storage_key(key);
        let payload = match self.backend.get_item(&storage_key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "failed to read durable cache entry");
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<V>>(&payload) {
            Ok(entry) if entry.is_expired_at(self.clock.now_ms()) => {
                debug!(key, "durable cache dropped expired entry");
                self.remove_quietly(&storage_key);
                None
            }
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(key, error = %err, "discarding unparseable durable cache entry");
                self.remove_quietly(&storage_key);
                None
            }
        }
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_entry(key).map(|entry| entry.value)
    }

    // == Has ==
    pub fn has(&self, key: &str) -> bool {
        self.get_entry(key).is_some()
    }

    // == Delete ==
    /// Removes an entry, returning whether one was present.
    pub fn delete(&self, key: &str) -> bool {
        match self.backend.remove_item(&self.storage_key(key)) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(key, error = %err, "failed to delete durable cache entry");
                false
            }
        }
    }

    // == Clear ==
    /// Removes every key under this store's prefix, leaving other data alone.
    pub fn clear(&self) {
        let keys = match self.namespaced_keys() {
            Ok(keys) => keys,
            Err(err) => {
                warn!(prefix = %self.prefix, error = %err, "failed to clear durable cache");
                return;
            }
        };

        for storage_key in keys {
            self.remove_quietly(&storage_key);
        }
    }

    // == Cleanup ==
    /// Sweeps the namespace, removing expired and unparseable entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&self) -> usize {
        let keys = match self.namespaced_keys() {
            Ok(keys) => keys,
            Err(err) => {
                warn!(prefix = %self.prefix, error = %err, "failed to clean up durable cache");
                return 0;
            }
        };

        let now = self.clock.now_ms();
        let mut removed = 0;
        for storage_key in keys {
            let stale = match self.backend.get_item(&storage_key) {
                Ok(Some(payload)) => match serde_json::from_str::<CacheEntry<V>>(&payload) {
                    Ok(entry) => entry.is_expired_at(now),
                    Err(_) => true,
                },
                Ok(None) => false,
                Err(err) => {
                    warn!(key = %storage_key, error = %err, "failed to read durable cache entry");
                    false
                }
            };

            if stale && self.remove_quietly(&storage_key) {
                removed += 1;
            }
        }

        removed
    }

    // == Stats ==
    pub fn stats(&self) -> DurableStats {
        let size = match self.namespaced_keys() {
            Ok(keys) => keys.len(),
            Err(err) => {
                warn!(prefix = %self.prefix, error = %err, "failed to count durable cache entries");
                0
            }
        };

        DurableStats {
            size,
            prefix: self.prefix.clone(),
        }
    }

    fn namespaced_keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .backend
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(&self.prefix))
            .collect())
    }

    fn remove_quietly(&self, storage_key: &str) -> bool {
        match self.backend.remove_item(storage_key) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(key = %storage_key, error = %err, "failed to remove durable cache entry");
                false
            }
        }
    }
}
