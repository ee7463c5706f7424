//! Memory Store Module
//!
//! Bounded, in-process TTL store: the fast layer of the layered cache.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::clock::{system_clock, SharedClock};
use crate::cache::entry::resolve_ttl;
use crate::cache::{CacheEntry, InsertionOrder, MemoryStats};

// == Memory Store ==
/// Fixed-capacity TTL store with first-in, first-out eviction.
///
/// Expiry is lazy: an expired entry is dropped when it is read, or when
/// `size`, `stats` or `purge_expired` sweep the whole map.
#[derive(Debug)]
pub struct MemoryStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion order used to choose eviction victims
    order: InsertionOrder,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for writes that don't pass one
    default_ttl: Duration,
    /// Entries evicted for capacity
    evictions: u64,
    clock: SharedClock,
}

impl<V: Clone> MemoryStore<V> {
    // == Constructor ==
    /// Creates a store with the given capacity and default TTL.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self::with_clock(capacity, default_ttl, system_clock())
    }

    pub fn with_clock(capacity: usize, default_ttl: Duration, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            capacity: capacity.max(1),
            default_ttl,
            evictions: 0,
            clock,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for `key`.
    ///
    /// An overwrite keeps the key's original insertion position. When a
    /// new key arrives at capacity, the oldest inserted key is evicted
    /// first, whether or not it was read recently.
    pub fn set(&mut self, key: &str, value: V, ttl: Option<Duration>) {
        let now = self.clock.now_ms();
        let entry = CacheEntry::new(value, resolve_ttl(ttl, self.default_ttl), now);

        if let Some(existing) = self.entries.get_mut(key) {
            *existing = entry;
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted_key) = self.order.pop_oldest() {
                self.entries.remove(&evicted_key);
                self.evictions += 1;
                debug!(key = %evicted_key, "memory cache evicted oldest entry");
            }
        }

        self.order.push(key);
        self.entries.insert(key.to_string(), entry);
    }

    // == Get ==
    /// Returns the value if present and unexpired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if self.evict_if_expired(key) {
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Presence check with the same expiry semantics as `get`.
    pub fn has(&mut self, key: &str) -> bool {
        !self.evict_if_expired(key) && self.entries.contains_key(key)
    }

    // == Peek Entry ==
    /// Returns the raw entry without checking expiry or touching the store.
    pub fn peek_entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Delete ==
    /// Removes an entry, returning whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Size ==
    /// Returns the number of live entries, sweeping expired ones first.
    pub fn size(&mut self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    // == Stats ==
    pub fn stats(&mut self) -> MemoryStats {
        self.purge_expired();
        MemoryStats {
            size: self.entries.len(),
            capacity: self.capacity,
            evictions: self.evictions,
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.order.remove(key);
        }

        expired_keys.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raw entry count, including entries that expired but were not swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops `key` if it has expired. Returns true when it did.
    fn evict_if_expired(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => return false,
        };

        if expired {
            self.entries.remove(key);
            self.order.remove(key);
            debug!(key, "memory cache dropped expired entry");
        }
        expired
    }
}
