//! Memoization Module
//!
//! Composite cache keys and a wrapper that serves async function results
//! from a `LayeredCache`.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheValue, LayeredCache};

/// Separator placed between key parts.
pub const KEY_DELIMITER: &str = ":";

// == Build Key ==
/// Joins the display form of each part with `:`, in order.
///
/// Order matters: callers should fix one layout per resource, e.g.
/// `resource:page:limit:filters:sort`.
pub fn build_key(parts: &[&dyn Display]) -> String {
    parts
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(KEY_DELIMITER)
}

/// Builds a cache key from any mix of `Display` values.
///
/// ```
/// use travel_cache::cache_key;
///
/// let page = 2;
/// assert_eq!(cache_key!("attractions", page, 12, "all"), "attractions:2:12:all");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($($part:expr),+ $(,)?) => {
        $crate::cache::build_key(&[$(&$part as &dyn ::std::fmt::Display),+])
    };
}

// == Cached Function ==
/// An async function whose successful results are cached.
///
/// Created by [`with_cache`].
pub struct CachedFn<V, F, K> {
    cache: Arc<LayeredCache<V>>,
    func: F,
    key_fn: K,
    ttl: Option<Duration>,
}

/// Wraps `func` so calls with equal keys are served from `cache`.
///
/// `key_fn` derives the key from the call's arguments; `ttl` is passed to
/// `LayeredCache::set` for each stored result.
pub fn with_cache<V, F, K>(
    cache: Arc<LayeredCache<V>>,
    func: F,
    key_fn: K,
    ttl: Option<Duration>,
) -> CachedFn<V, F, K> {
    CachedFn {
        cache,
        func,
        key_fn,
        ttl,
    }
}

impl<V: CacheValue, F, K> CachedFn<V, F, K> {
    /// Returns the cached result for `args`, or runs the function.
    ///
    /// Errors from the function are returned as-is and never cached, so
    /// the next call retries.
    pub async fn call<A, Fut, E>(&self, args: A) -> Result<V, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        K: Fn(&A) -> String,
    {
        let key = (self.key_fn)(&args);

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let value = (self.func)(args).await?;
        self.cache.set(&key, value.clone(), self.ttl).await;
        debug!(key = %key, "memoized result stored");

        Ok(value)
    }

    pub fn cache(&self) -> &Arc<LayeredCache<V>> {
        &self.cache
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LayeredConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_build_key_joins_in_order() {
        assert_eq!(build_key(&[&"weather", &"Beijing"]), "weather:Beijing");
        assert_eq!(
            build_key(&[&"attractions", &1, &12, &"all", &"all", &"none", &"rating"]),
            "attractions:1:12:all:all:none:rating"
        );
    }

    #[test]
    fn test_build_key_is_order_sensitive() {
        assert_ne!(build_key(&[&"a", &"b"]), build_key(&[&"b", &"a"]));
    }

    #[test]
    fn test_cache_key_macro() {
        let city = String::from("Chengdu");
        assert_eq!(cache_key!("weather", city), "weather:Chengdu");
        assert_eq!(cache_key!("guides", 3, 1.5,), "guides:3:1.5");
    }

    #[tokio::test]
    async fn test_ok_results_are_cached() {
        let cache = Arc::new(LayeredCache::<u32>::in_memory(LayeredConfig::default()));
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let square = with_cache(
            cache,
            move |n: u32| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, String>(n * n)
                }
            },
            |n: &u32| cache_key!("square", n),
            None,
        );

        assert_eq!(square.call(4).await, Ok(16));
        assert_eq!(square.call(4).await, Ok(16));
        assert_eq!(square.call(5).await, Ok(25));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = Arc::new(LayeredCache::<u32>::in_memory(LayeredConfig::default()));
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let flaky = with_cache(
            cache.clone(),
            move |_: ()| {
                let counter = counter.clone();
                async move {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst);
                    if attempt == 0 {
                        Err("upstream down".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            |_: &()| "flaky".to_string(),
            None,
        );

        assert_eq!(flaky.call(()).await, Err("upstream down".to_string()));
        assert!(!cache.has("flaky").await);

        assert_eq!(flaky.call(()).await, Ok(7));
        assert_eq!(flaky.call(()).await, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ttl_is_forwarded() {
        let cache = Arc::new(LayeredCache::<u32>::in_memory(LayeredConfig::default()));
        let cached = with_cache(
            cache.clone(),
            |n: u32| async move { Ok::<u32, ()>(n) },
            |n: &u32| cache_key!("id", n),
            Some(Duration::from_secs(60)),
        );

        cached.call(1).await.unwrap();

        let entry = cached.cache().peek_durable("id:1").await.unwrap();
        assert_eq!(entry.expires_at - entry.stored_at, 60_000);
    }
}
