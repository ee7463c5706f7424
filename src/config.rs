//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of entries in the memory layer
    pub max_entries: usize,
    /// TTL in milliseconds for writes that don't pass one
    pub default_ttl_ms: u64,
    /// Upper bound on memory-layer TTLs, in milliseconds
    pub memory_ttl_ceiling_ms: u64,
    /// Default durable-layer TTL in milliseconds
    pub durable_ttl_ms: u64,
    /// Namespace prefix for durable keys
    pub cache_prefix: String,
    /// Directory for the durable layer; in-memory when unset
    pub cache_dir: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Weather provider API key
    pub weather_api_key: String,
    /// Weather provider base URL
    pub weather_api_url: String,
    /// How long weather reports stay cached, in milliseconds
    pub weather_ttl_ms: u64,
    /// Cities whose weather is fetched at startup
    pub weather_preload: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Memory layer capacity (default: 100)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL (default: 300000)
    /// - `CACHE_MEMORY_TTL_CEILING_MS` - Memory TTL ceiling (default: 300000)
    /// - `CACHE_DURABLE_TTL_MS` - Durable default TTL (default: 1800000)
    /// - `CACHE_PREFIX` - Durable namespace (default: "travel_cache_")
    /// - `CACHE_DIR` - Durable storage directory (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `WEATHER_API_KEY` - Weather API key (default: "demo-key")
    /// - `WEATHER_API_URL` - Weather API base URL
    /// - `WEATHER_TTL_MS` - Weather cache TTL (default: 600000)
    /// - `WEATHER_PRELOAD` - Comma-separated cities (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_env("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl_ms: parse_env("CACHE_DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            memory_ttl_ceiling_ms: parse_env("CACHE_MEMORY_TTL_CEILING_MS")
                .unwrap_or(defaults.memory_ttl_ceiling_ms),
            durable_ttl_ms: parse_env("CACHE_DURABLE_TTL_MS").unwrap_or(defaults.durable_ttl_ms),
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_env("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            weather_api_key: env::var("WEATHER_API_KEY").unwrap_or(defaults.weather_api_key),
            weather_api_url: env::var("WEATHER_API_URL").unwrap_or(defaults.weather_api_url),
            weather_ttl_ms: parse_env("WEATHER_TTL_MS").unwrap_or(defaults.weather_ttl_ms),
            weather_preload: env::var("WEATHER_PRELOAD")
                .map(|cities| parse_list(&cities))
                .unwrap_or(defaults.weather_preload),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            default_ttl_ms: 5 * 60 * 1000,
            memory_ttl_ceiling_ms: 5 * 60 * 1000,
            durable_ttl_ms: 30 * 60 * 1000,
            cache_prefix: "travel_cache_".to_string(),
            cache_dir: None,
            server_port: 3000,
            cleanup_interval: 60,
            weather_api_key: "demo-key".to_string(),
            weather_api_url: "https://devapi.qweather.com/v7".to_string(),
            weather_ttl_ms: 10 * 60 * 1000,
            weather_preload: Vec::new(),
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
