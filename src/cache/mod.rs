//! Cache Module
//!
//! Layered caching: a bounded in-memory TTL store in front of a durable,
//! namespaced TTL store, plus key building and memoization helpers.

mod backend;
mod clock;
mod durable;
mod entry;
mod layered;
mod memo;
mod memory;
mod order;
mod stats;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;

// Re-export public types
pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use clock::{current_timestamp_ms, system_clock, Clock, ManualClock, SharedClock, SystemClock};
pub use durable::DurableStore;
pub use entry::CacheEntry;
pub use layered::{open_backend, LayeredCache, LayeredConfig};
pub use memo::{build_key, with_cache, CachedFn, KEY_DELIMITER};
pub use memory::MemoryStore;
pub use order::InsertionOrder;
pub use stats::{DurableStats, HitCounters, HitStats, LayeredStats, MemoryStats};

// == Cache Value ==
/// Bounds every cached payload must meet.
pub trait CacheValue: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// JSON-valued cache shared by callers with heterogeneous payloads.
pub type JsonCache = LayeredCache<serde_json::Value>;

static DEFAULT_CACHE: Lazy<Arc<JsonCache>> =
    Lazy::new(|| Arc::new(LayeredCache::from_config(&Config::from_env())));

// == Default Cache ==
/// Process-wide cache built from the environment on first use.
///
/// Prefer passing an explicit `Arc<LayeredCache<_>>`; this exists for call
/// sites with no wiring of their own.
pub fn default_cache() -> Arc<JsonCache> {
    Arc::clone(&DEFAULT_CACHE)
}
