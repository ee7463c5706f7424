//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries from a
//! layered cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheValue, LayeredCache};

/// Spawns a background task that periodically cleans up expired entries.
///
/// The task sleeps for `cleanup_interval_secs` between sweeps and runs
/// until its handle is aborted.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(LayeredCache::from_config(&config));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V: CacheValue>(
    cache: Arc<LayeredCache<V>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LayeredConfig, ManualClock, MemoryBackend};
    use serde_json::{json, Value};

    fn cache_with_clock() -> (Arc<LayeredCache<Value>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = LayeredCache::with_clock(
            LayeredConfig::default(),
            Arc::new(MemoryBackend::new()),
            clock.clone(),
        );
        (Arc::new(cache), clock)
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let (cache, clock) = cache_with_clock();
        cache
            .set("expire_soon", json!("value"), Some(Duration::from_secs(1)))
            .await;
        clock.advance(Duration::from_secs(2));

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Swept without any read touching the key
        assert!(cache.peek_memory("expire_soon").await.is_none());
        assert_eq!(cache.stats().await.durable.size, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let (cache, _clock) = cache_with_clock();
        cache
            .set("long_lived", json!("value"), Some(Duration::from_secs(3600)))
            .await;

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.get("long_lived").await, Some(json!("value")));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let (cache, _clock) = cache_with_clock();

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
