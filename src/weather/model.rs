//! Weather data types.

use serde::{Deserialize, Serialize};

use crate::cache_key;

// == Weather Report ==
/// Current conditions plus a daily forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Degrees Celsius
    pub temperature: i32,
    /// Display label, e.g. "Light rain"
    pub condition: String,
    /// Provider icon code
    pub condition_code: String,
    /// Relative humidity, percent
    pub humidity: i32,
    /// km/h
    pub wind_speed: i32,
    pub wind_direction: String,
    /// km
    pub visibility: i32,
    /// hPa
    pub pressure: i32,
    pub uv_index: i32,
    pub feels_like: i32,
    pub city: String,
    /// Observation time as reported by the provider
    pub update_time: String,
    pub forecast: Vec<DailyForecast>,
}

// == Daily Forecast ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// `YYYY-MM-DD`
    pub date: String,
    pub day_of_week: String,
    pub high: i32,
    pub low: i32,
    pub condition: String,
    pub condition_code: String,
    /// mm
    pub rainfall: f64,
    pub wind_speed: i32,
}

// == Location ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// What to look up: a city name, optionally pinned by coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub coordinates: Option<Coordinates>,
}

impl Location {
    pub fn city(name: impl Into<String>) -> Self {
        Self {
            city: name.into(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            city: name.into(),
            coordinates: Some(Coordinates { lat, lng }),
        }
    }

    /// Cache key: coordinates when known, otherwise the city name.
    pub fn cache_key(&self) -> String {
        match self.coordinates {
            Some(Coordinates { lat, lng }) => cache_key!("weather", format!("{},{}", lat, lng)),
            None => cache_key!("weather", self.city),
        }
    }

    /// Value for the provider's `location` query parameter (`lng,lat`).
    pub fn query(&self) -> String {
        match self.coordinates {
            Some(Coordinates { lat, lng }) => format!("{},{}", lng, lat),
            None => self.city.clone(),
        }
    }
}
