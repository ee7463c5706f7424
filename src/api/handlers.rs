//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::{JsonCache, LayeredCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ClearResponse, CleanupResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, StatsResponse, WeatherQuery, WeatherResponse,
};
use crate::weather::{Location, QWeatherProvider, WeatherService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// General purpose JSON cache
    pub cache: Arc<JsonCache>,
    /// Memoized weather lookups
    pub weather: Arc<WeatherService>,
}

impl AppState {
    pub fn new(cache: Arc<JsonCache>, weather: Arc<WeatherService>) -> Self {
        Self { cache, weather }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The weather cache gets its own durable storage (a `weather`
    /// subdirectory when `cache_dir` is set), so JSON entries and weather
    /// reports never share a namespace.
    pub fn from_config(config: &Config) -> Self {
        let cache = Arc::new(LayeredCache::from_config(config));

        let weather_config = Config {
            cache_dir: config.cache_dir.as_ref().map(|dir| dir.join("weather")),
            ..config.clone()
        };
        let provider = Arc::new(QWeatherProvider::new(
            config.weather_api_url.clone(),
            config.weather_api_key.clone(),
        ));
        let weather = WeatherService::new(
            provider,
            Arc::new(LayeredCache::from_config(&weather_config)),
            Duration::from_millis(config.weather_ttl_ms),
        );

        Self::new(cache, Arc::new(weather))
    }
}

/// Handler for PUT /cache
///
/// Stores a JSON value with an optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    state.cache.set(&req.key, req.value, ttl).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.delete(&key).await {
        return Err(ApiError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /cache
///
/// Clears the JSON cache and the weather cache.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    state.weather.cache().clear().await;
    info!("cache cleared via API");

    Json(ClearResponse::new())
}

/// Handler for POST /cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.cache.cleanup().await + state.weather.cache().cleanup().await;
    Json(CleanupResponse { removed })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        cache: state.cache.stats().await,
        weather: state.weather.cache().stats().await,
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /weather/:city
///
/// Optional `lat`/`lng` query parameters pin the lookup to coordinates.
pub async fn weather_handler(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let location = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Location::with_coordinates(city, lat, lng),
        _ => Location::city(city),
    };
    let report = state.weather.report(location).await?;

    Ok(Json(WeatherResponse::new(report)))
}
