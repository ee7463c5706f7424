//! Layered Cache Module
//!
//! Facade combining the bounded memory store and the durable store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info, warn};

use crate::cache::clock::{system_clock, SharedClock};
use crate::cache::entry::resolve_ttl;
use crate::cache::{
    CacheEntry, CacheValue, DurableStats, DurableStore, FileBackend, HitCounters, LayeredStats,
    MemoryBackend, MemoryStore, StorageBackend,
};
use crate::config::Config;

// == Layered Config ==
/// Sizing and TTL policy for a `LayeredCache`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredConfig {
    /// Capacity of the memory layer
    pub memory_capacity: usize,
    /// TTL requested for writes that don't pass one (memory side)
    pub default_ttl: Duration,
    /// Upper bound on any memory-layer TTL, including promotions
    pub memory_ttl_ceiling: Duration,
    /// TTL for durable writes that don't pass one
    pub durable_default_ttl: Duration,
    /// Namespace prefix in the durable backend
    pub prefix: String,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 50,
            default_ttl: Duration::from_secs(5 * 60),
            memory_ttl_ceiling: Duration::from_secs(5 * 60),
            durable_default_ttl: Duration::from_secs(30 * 60),
            prefix: "travel_cache_".to_string(),
        }
    }
}

impl From<&Config> for LayeredConfig {
    fn from(config: &Config) -> Self {
        Self {
            memory_capacity: config.max_entries,
            default_ttl: Duration::from_millis(config.default_ttl_ms),
            memory_ttl_ceiling: Duration::from_millis(config.memory_ttl_ceiling_ms),
            durable_default_ttl: Duration::from_millis(config.durable_ttl_ms),
            prefix: config.cache_prefix.clone(),
        }
    }
}

// == Layered Cache ==
/// Two-level cache: a short-lived memory layer in front of a long-lived
/// durable layer.
///
/// Reads try memory, then durable (promoting hits back into memory).
/// Writes go to both layers, so the two can expire at different times for
/// the same key.
///
/// `get`, `set`, `delete` and `clear` hold the memory lock for the whole
/// operation, durable step included. Durable calls run on the blocking
/// pool since backends may do file I/O.
pub struct LayeredCache<V> {
    memory: Mutex<MemoryStore<V>>,
    durable: Arc<DurableStore<V>>,
    default_ttl: Duration,
    memory_ttl_ceiling: Duration,
    durable_default_ttl: Duration,
    counters: HitCounters,
}

impl<V: CacheValue> LayeredCache<V> {
    // == Constructors ==
    pub fn new(config: LayeredConfig, backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_clock(config, backend, system_clock())
    }

    pub fn with_clock(config: LayeredConfig, backend: Arc<dyn StorageBackend>, clock: SharedClock) -> Self {
        let memory = MemoryStore::with_clock(config.memory_capacity, config.default_ttl, clock.clone());
        let durable = DurableStore::with_clock(backend, config.prefix, config.durable_default_ttl, clock);

        Self {
            memory: Mutex::new(memory),
            durable: Arc::new(durable),
            default_ttl: config.default_ttl,
            memory_ttl_ceiling: config.memory_ttl_ceiling,
            durable_default_ttl: config.durable_default_ttl,
            counters: HitCounters::new(),
        }
    }

    /// Cache whose durable layer is an in-process `MemoryBackend`.
    pub fn in_memory(config: LayeredConfig) -> Self {
        Self::new(config, Arc::new(MemoryBackend::new()))
    }

    /// Builds a cache from server configuration, opening its backend.
    pub fn from_config(config: &Config) -> Self {
        Self::new(LayeredConfig::from(config), open_backend(config))
    }

    /// Runs `op` against the durable layer on the blocking pool.
    ///
    /// `None` only if the blocking task panicked or was cancelled.
    async fn on_durable<R, F>(&self, op: F) -> Option<R>
    where
        F: FnOnce(&DurableStore<V>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let durable = Arc::clone(&self.durable);
        match task::spawn_blocking(move || op(&durable)).await {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(prefix = %self.durable.prefix(), error = %err, "durable cache task failed");
                None
            }
        }
    }

    // == Get ==
    /// Looks up `key`, memory layer first.
    ///
    /// A durable hit is promoted into the memory layer with the memory
    /// TTL ceiling, regardless of how long it has left in durable storage.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut memory = self.memory.lock().await;
        if let Some(value) = memory.get(key) {
            self.counters.record_memory_hit();
            debug!(key, "cache hit (memory)");
            return Some(value);
        }

        let owned = key.to_string();
        match self.on_durable(move |durable| durable.get(&owned)).await.flatten() {
            Some(value) => {
                memory.set(key, value.clone(), Some(self.memory_ttl_ceiling));
                self.counters.record_durable_hit();
                debug!(key, "cache hit (durable), promoted to memory");
                Some(value)
            }
            None => {
                self.counters.record_miss();
                debug!(key, "cache miss");
                None
            }
        }
    }

    // == Set ==
    /// Writes `value` to both layers.
    ///
    /// Memory TTL is `min(ttl or default, ceiling)`; durable TTL is
    /// `ttl or durable default`.
    pub async fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let memory_ttl = resolve_ttl(ttl, self.default_ttl).min(self.memory_ttl_ceiling);
        let durable_ttl = resolve_ttl(ttl, self.durable_default_ttl);

        let mut memory = self.memory.lock().await;
        let owned = key.to_string();
        let stored = value.clone();
        self.on_durable(move |durable| durable.set(&owned, &stored, Some(durable_ttl)))
            .await;
        memory.set(key, value, Some(memory_ttl));
    }

    // == Has ==
    pub async fn has(&self, key: &str) -> bool {
        let mut memory = self.memory.lock().await;
        if memory.has(key) {
            return true;
        }

        let owned = key.to_string();
        self.on_durable(move |durable| durable.has(&owned))
            .await
            .unwrap_or(false)
    }

    // == Delete ==
    /// Deletes from both layers; true if either held the key.
    pub async fn delete(&self, key: &str) -> bool {
        let mut memory = self.memory.lock().await;
        let memory_deleted = memory.delete(key);

        let owned = key.to_string();
        let durable_deleted = self
            .on_durable(move |durable| durable.delete(&owned))
            .await
            .unwrap_or(false);
        memory_deleted || durable_deleted
    }

    // == Clear ==
    pub async fn clear(&self) {
        let mut memory = self.memory.lock().await;
        memory.clear();
        self.on_durable(|durable| durable.clear()).await;
        info!(prefix = %self.durable.prefix(), "cache cleared");
    }

    // == Cleanup ==
    /// Sweeps expired entries from both layers.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup(&self) -> usize {
        let from_memory = self.memory.lock().await.purge_expired();
        let from_durable = self
            .on_durable(|durable| durable.cleanup())
            .await
            .unwrap_or(0);
        from_memory + from_durable
    }

    // == Stats ==
    pub async fn stats(&self) -> LayeredStats {
        let memory = self.memory.lock().await.stats();
        let durable = match self.on_durable(|durable| durable.stats()).await {
            Some(stats) => stats,
            None => DurableStats {
                size: 0,
                prefix: self.durable.prefix().to_string(),
            },
        };

        LayeredStats {
            memory,
            durable,
            reads: self.counters.snapshot(),
        }
    }

    // == Layer Inspection ==
    /// Raw memory-layer entry, without expiry checks.
    pub async fn peek_memory(&self, key: &str) -> Option<CacheEntry<V>> {
        self.memory.lock().await.peek_entry(key).cloned()
    }

    /// Durable-layer entry, with the durable layer's usual expiry handling.
    pub async fn peek_durable(&self, key: &str) -> Option<CacheEntry<V>> {
        let owned = key.to_string();
        self.on_durable(move |durable| durable.get_entry(&owned))
            .await
            .flatten()
    }
}

/// Opens the configured durable backend.
///
/// Falls back to an in-process backend when no directory is configured
/// or the directory can't be opened.
pub fn open_backend(config: &Config) -> Arc<dyn StorageBackend> {
    match &config.cache_dir {
        Some(dir) => match FileBackend::open(dir) {
            Ok(backend) => {
                info!(dir = %dir.display(), "durable cache stored on disk");
                Arc::new(backend)
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "falling back to in-memory durable cache");
                Arc::new(MemoryBackend::new())
            }
        },
        None => Arc::new(MemoryBackend::new()),
    }
}
