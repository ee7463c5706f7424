//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache invariants over random operation
//! sequences. Time is simulated with `ManualClock`, so no test sleeps.

use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{build_key, LayeredCache, LayeredConfig, ManualClock, MemoryBackend, MemoryStore};

// == Test Configuration ==
const TEST_CAPACITY: usize = 8;
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates keys from a small alphabet so sequences revisit keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-j]{1,2}".prop_map(|s| s)
}

fn key_part_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
    Advance { millis: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => (0u64..120_000).prop_map(|millis| CacheOp::Advance { millis }),
    ]
}

fn test_store() -> (MemoryStore<u32>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let store = MemoryStore::with_clock(TEST_CAPACITY, TEST_DEFAULT_TTL, clock.clone());
    (store, clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Capacity: the store never holds more than its capacity
    #[test]
    fn prop_capacity_enforcement(ops in prop::collection::vec(cache_op_strategy(), 1..200)) {
        let (mut store, clock) = test_store();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(&key, value, None),
                CacheOp::Get { key } => { store.get(&key); }
                CacheOp::Delete { key } => { store.delete(&key); }
                CacheOp::Advance { millis } => clock.advance(Duration::from_millis(millis)),
            }
            prop_assert!(
                store.len() <= TEST_CAPACITY,
                "Cache size {} exceeds capacity {}",
                store.len(),
                TEST_CAPACITY
            );
        }
    }

    // Eviction follows insertion order, whatever was read in between
    #[test]
    fn prop_fifo_eviction_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..200)) {
        let (mut store, _clock) = test_store();
        let mut model: VecDeque<(String, u32)> = VecDeque::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(&key, value, None);
                    if let Some(slot) = model.iter_mut().find(|(k, _)| *k == key) {
                        slot.1 = value;
                    } else {
                        if model.len() >= TEST_CAPACITY {
                            model.pop_front();
                        }
                        model.push_back((key, value));
                    }
                }
                CacheOp::Get { key } => {
                    let expected = model.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
                    prop_assert_eq!(store.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    let existed = model.iter().any(|(k, _)| *k == key);
                    model.retain(|(k, _)| *k != key);
                    prop_assert_eq!(store.delete(&key), existed);
                }
                // Clock stays still so nothing expires
                CacheOp::Advance { .. } => {}
            }
        }

        prop_assert_eq!(store.size(), model.len());
    }

    // TTL: a value is served strictly before expiry and never at or after it
    #[test]
    fn prop_ttl_boundary(
        key in key_strategy(),
        value in any::<u32>(),
        ttl_ms in 1u64..1_000_000,
        reads_before in 0usize..5
    ) {
        let (mut store, clock) = test_store();
        store.set(&key, value, Some(Duration::from_millis(ttl_ms)));

        for _ in 0..reads_before {
            prop_assert!(store.has(&key));
            prop_assert_eq!(store.get(&key), Some(value));
        }

        clock.advance(Duration::from_millis(ttl_ms - 1));
        prop_assert_eq!(store.get(&key), Some(value));

        clock.advance(Duration::from_millis(1));
        prop_assert_eq!(store.get(&key), None);
        prop_assert!(!store.has(&key));
    }

    // Keys: same parts give the same key; swapping distinct parts changes it
    #[test]
    fn prop_key_building(a in key_part_strategy(), b in key_part_strategy(), n in any::<u32>()) {
        prop_assert_eq!(build_key(&[&a, &b, &n]), build_key(&[&a, &b, &n]));
        if a != b {
            prop_assert_ne!(build_key(&[&a, &b]), build_key(&[&b, &a]));
        }
    }

    // Layered: after set, both the facade and the durable layer return the value
    #[test]
    fn prop_layered_write_through(key in key_part_strategy(), value in any::<u32>(), ttl_s in 1u64..7_200) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let clock = Arc::new(ManualClock::new(0));
            let cache: LayeredCache<u32> = LayeredCache::with_clock(
                LayeredConfig::default(),
                Arc::new(MemoryBackend::new()),
                clock.clone(),
            );

            cache.set(&key, value, Some(Duration::from_secs(ttl_s))).await;

            assert_eq!(cache.peek_memory(&key).await.map(|e| e.value), Some(value));
            assert_eq!(cache.peek_durable(&key).await.map(|e| e.value), Some(value));
            assert_eq!(cache.get(&key).await, Some(value));
        });
    }
}
