//! Travel Cache - multi-layer caching for a travel assistant backend
//!
//! A bounded FIFO memory layer with per-entry TTL in front of a namespaced
//! durable layer, plus key building and function memoization on top.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod weather;

pub use api::AppState;
pub use cache::default_cache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
