//! Weather display and travel advice helpers.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::weather::WeatherReport;

// == Conditions ==
/// Display metadata for a normalised weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionDisplay {
    pub code: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

const CONDITIONS: &[ConditionDisplay] = &[
    ConditionDisplay { code: "sunny", label: "Sunny", icon: "☀️" },
    ConditionDisplay { code: "cloudy", label: "Cloudy", icon: "☁️" },
    ConditionDisplay { code: "overcast", label: "Overcast", icon: "☁️" },
    ConditionDisplay { code: "light-rain", label: "Light rain", icon: "🌦️" },
    ConditionDisplay { code: "moderate-rain", label: "Moderate rain", icon: "🌧️" },
    ConditionDisplay { code: "heavy-rain", label: "Heavy rain", icon: "⛈️" },
    ConditionDisplay { code: "thunderstorm", label: "Thunderstorm", icon: "⛈️" },
    ConditionDisplay { code: "snow", label: "Snow", icon: "❄️" },
    ConditionDisplay { code: "fog", label: "Fog", icon: "🌫️" },
    ConditionDisplay { code: "haze", label: "Haze", icon: "😶‍🌫️" },
    ConditionDisplay { code: "sandstorm", label: "Sandstorm", icon: "🌪️" },
];

const UNKNOWN_CONDITION: ConditionDisplay = ConditionDisplay {
    code: "unknown",
    label: "Unknown",
    icon: "❓",
};

/// Maps free-text provider conditions onto a known label.
///
/// Text that matches no known condition is returned unchanged.
pub fn normalize_condition(text: &str) -> String {
    let lowered = text.to_lowercase();
    CONDITIONS
        .iter()
        .find(|c| lowered.contains(&c.code.replace('-', " ")))
        .map(|c| c.label.to_string())
        .unwrap_or_else(|| text.to_string())
}

pub fn condition_display(code: &str) -> ConditionDisplay {
    CONDITIONS
        .iter()
        .copied()
        .find(|c| c.code == code)
        .unwrap_or(UNKNOWN_CONDITION)
}

// == Wind ==
pub fn wind_direction(code: &str) -> String {
    let name = match code {
        "N" => "North",
        "NE" => "Northeast",
        "E" => "East",
        "SE" => "Southeast",
        "S" => "South",
        "SW" => "Southwest",
        "W" => "West",
        "NW" => "Northwest",
        other => other,
    };
    name.to_string()
}

// == Dates ==
/// Weekday name for a `YYYY-MM-DD` date; the input itself if it won't parse.
pub fn day_of_week(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => weekday_name(parsed.weekday()).to_string(),
        Err(_) => date.to_string(),
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// == UV Index ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UvIndexInfo {
    pub level: &'static str,
    pub description: &'static str,
}

/// Exposure level for a UV index, clamped to 0..=10.
pub fn uv_index_info(uv_index: i32) -> UvIndexInfo {
    let (level, description) = match uv_index.clamp(0, 10) {
        0 => ("None", "No protection needed"),
        1..=2 => ("Low", "Safe to be outside"),
        3..=5 => ("Moderate", "Some protection advised"),
        6..=7 => ("High", "Protection required"),
        8..=9 => ("Very high", "Extra protection required"),
        _ => ("Extreme", "Avoid being outside"),
    };
    UvIndexInfo { level, description }
}

// == Advice ==
/// Air quality hint derived from visibility in km.
pub fn air_quality_advice(visibility: i32) -> &'static str {
    match visibility {
        v if v >= 20 => "Excellent air quality, great for sightseeing",
        v if v >= 10 => "Good air quality, normal activities are fine",
        v if v >= 5 => "Fair air quality, sensitive groups should limit time outdoors",
        _ => "Poor air quality, reduce outdoor activities",
    }
}

/// One-line travel suggestion for a report.
///
/// Checked in order: precipitation, heat, cold, UV, wind.
pub fn travel_advice(report: &WeatherReport) -> &'static str {
    let condition = report.condition.to_lowercase();

    if condition.contains("rain") || condition.contains("thunder") {
        "Rain expected, bring an umbrella; indoor attractions are a better fit"
    } else if report.temperature > 35 {
        "Very hot, stay hydrated and pick shaded attractions"
    } else if report.temperature < 0 {
        "Below freezing, dress warmly and favour indoor attractions"
    } else if report.uv_index > 7 {
        "Strong UV, use sun protection and avoid the midday sun"
    } else if report.wind_speed > 20 {
        "Strong wind, take care during outdoor activities"
    } else {
        "Good conditions for travel"
    }
}
