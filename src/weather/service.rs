//! Cached weather lookups.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{with_cache, CachedFn, LayeredCache};
use crate::error::WeatherError;
use crate::weather::{Location, WeatherProvider, WeatherReport};

type FetchFuture = Pin<Box<dyn Future<Output = Result<WeatherReport, WeatherError>> + Send>>;
type FetchFn = Box<dyn Fn(Location) -> FetchFuture + Send + Sync>;
type KeyFn = fn(&Location) -> String;

// == Weather Service ==
/// Weather lookups memoized per location.
///
/// Reports are keyed `weather:<city>` or `weather:<lat>,<lng>`. Failed
/// lookups are returned to the caller and not cached.
pub struct WeatherService {
    lookup: CachedFn<WeatherReport, FetchFn, KeyFn>,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<LayeredCache<WeatherReport>>,
        ttl: Duration,
    ) -> Self {
        let fetch: FetchFn = Box::new(move |location: Location| -> FetchFuture {
            let provider = Arc::clone(&provider);
            Box::pin(async move { provider.fetch(&location).await })
        });

        Self {
            lookup: with_cache(cache, fetch, Location::cache_key as KeyFn, Some(ttl)),
        }
    }

    // == Report ==
    pub async fn report(&self, location: Location) -> Result<WeatherReport, WeatherError> {
        self.lookup.call(location).await
    }

    // == Preload ==
    /// Warms the cache for `cities`, logging failures.
    ///
    /// Returns how many cities were loaded.
    pub async fn preload(&self, cities: &[String]) -> usize {
        let mut loaded = 0;
        for city in cities {
            match self.report(Location::city(city.as_str())).await {
                Ok(_) => loaded += 1,
                Err(err) => warn!(city = %city, error = %err, "failed to preload weather"),
            }
        }
        info!(loaded, requested = cities.len(), "weather preload finished");
        loaded
    }

    pub fn cache(&self) -> &Arc<LayeredCache<WeatherReport>> {
        self.lookup.cache()
    }
}
