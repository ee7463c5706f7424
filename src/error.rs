//! Error types for the cache library and its HTTP service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Storage Error ==
/// Failure of a durable storage medium.
///
/// The durable layer logs and swallows these; they never reach cache callers.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failed
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Write would exceed the medium's quota
    #[error("storage quota exceeded: {used} of {quota} bytes")]
    QuotaExceeded { used: usize, quota: usize },

    /// Medium is not available
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

// == Weather Error ==
/// Failure of an upstream weather lookup.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Transport or HTTP status failure
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success code
    #[error("weather provider returned code {code}")]
    Api { code: String },

    /// Payload is missing a field or holds an unparseable one
    #[error("malformed weather payload: {0}")]
    Malformed(String),
}

// == Api Error Enum ==
/// Error type for the HTTP service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream service failed
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
