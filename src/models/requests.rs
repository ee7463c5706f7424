//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies and queries.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the SET operation (PUT /cache)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl_ms`: Optional TTL in milliseconds (uses the cache defaults if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms.map(Duration::from_millis)
    }
}

/// Query string for GET /weather/:city
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl WeatherQuery {
    /// Coordinates must be given together, and within range.
    pub fn validate(&self) -> Option<String> {
        match (self.lat, self.lng) {
            (None, None) => None,
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                    Some("Coordinates out of range".to_string())
                } else {
                    None
                }
            }
            _ => Some("lat and lng must be given together".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": {"total": 4}}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, serde_json::json!({"total": 4}));
        assert!(req.ttl().is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl_ms": 60000}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: Value::Null,
            ttl_ms: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_long_key() {
        let req = SetRequest {
            key: "x".repeat(MAX_KEY_LENGTH + 1),
            value: Value::Null,
            ttl_ms: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "attractions:1:12".to_string(),
            value: Value::Bool(true),
            ttl_ms: Some(300_000),
        };
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_weather_query_validate() {
        assert!(WeatherQuery::default().validate().is_none());
        assert!(WeatherQuery { lat: Some(39.9), lng: Some(116.4) }.validate().is_none());
        assert!(WeatherQuery { lat: Some(39.9), lng: None }.validate().is_some());
        assert!(WeatherQuery { lat: Some(95.0), lng: Some(0.0) }.validate().is_some());
    }
}
