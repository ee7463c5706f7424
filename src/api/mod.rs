//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `PUT /cache`, `DELETE /cache` - Store a value, clear everything
//! - `GET /cache/:key`, `DELETE /cache/:key` - Read or delete one key
//! - `POST /cleanup` - Purge expired entries
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint
//! - `GET /weather/:city` - Cached weather lookup

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
