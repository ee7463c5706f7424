//! Cache Statistics Module
//!
//! Per-layer snapshots plus hit/miss counters for the layered cache.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Memory Stats ==
/// Snapshot of the bounded memory layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// Live entries after the expiry sweep
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Entries dropped to make room for new keys
    pub evictions: u64,
}

// == Durable Stats ==
/// Snapshot of the durable layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DurableStats {
    /// Keys stored under this layer's namespace
    pub size: usize,
    /// Namespace prefix
    pub prefix: String,
}

// == Hit Stats ==
/// Read outcomes observed by the layered cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HitStats {
    pub hits: u64,
    pub memory_hits: u64,
    pub durable_hits: u64,
    pub misses: u64,
    /// hits / (hits + misses), or 0.0 if no reads have been made
    pub hit_rate: f64,
}

// == Layered Stats ==
/// Combined summary returned by `LayeredCache::stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayeredStats {
    pub memory: MemoryStats,
    pub durable: DurableStats,
    pub reads: HitStats,
}

// == Hit Counters ==
/// Lock-free counters updated on every layered read.
#[derive(Debug, Default)]
pub struct HitCounters {
    memory_hits: AtomicU64,
    durable_hits: AtomicU64,
    misses: AtomicU64,
}

impl HitCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_memory_hit(&self) {
        self.memory_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_durable_hit(&self) {
        self.durable_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> HitStats {
        let memory_hits = self.memory_hits.load(Ordering::Relaxed);
        let durable_hits = self.durable_hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hits = memory_hits + durable_hits;
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        HitStats {
            hits,
            memory_hits,
            durable_hits,
            misses,
            hit_rate,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let stats = HitCounters::new().snapshot();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let counters = HitCounters::new();
        counters.record_memory_hit();
        counters.record_durable_hit();

        let stats = counters.snapshot();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.memory_hits, 1);
        assert_eq!(stats.durable_hits, 1);
        assert_eq!(stats.hit_rate, 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let counters = HitCounters::new();
        counters.record_memory_hit();
        counters.record_miss();

        assert_eq!(counters.snapshot().hit_rate, 0.5);
    }

    #[test]
    fn test_layered_stats_serialize() {
        let stats = LayeredStats {
            memory: MemoryStats {
                size: 1,
                capacity: 50,
                evictions: 0,
            },
            durable: DurableStats {
                size: 3,
                prefix: "travel_cache_".to_string(),
            },
            reads: HitStats::default(),
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["memory"]["capacity"], 50);
        assert_eq!(json["durable"]["prefix"], "travel_cache_");
        assert_eq!(json["reads"]["hit_rate"], 0.0);
    }
}
