//! Weather Module
//!
//! Weather lookups for destinations, memoized through the layered cache.

pub mod advice;
mod model;
mod provider;
mod service;

pub use model::{Coordinates, DailyForecast, Location, WeatherReport};
pub use provider::{QWeatherProvider, WeatherProvider};
pub use service::WeatherService;
