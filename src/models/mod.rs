//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{SetRequest, WeatherQuery, MAX_KEY_LENGTH};
pub use responses::{
    ClearResponse, CleanupResponse, DeleteResponse, ErrorResponse, GetResponse, HealthResponse,
    SetResponse, StatsResponse, WeatherResponse,
};
