//! Weather providers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::WeatherError;
use crate::weather::advice::{day_of_week, normalize_condition, wind_direction};
use crate::weather::{DailyForecast, Location, WeatherReport};

/// Number of forecast days kept in a report.
const FORECAST_DAYS: usize = 7;

// == Weather Provider ==
/// Source of weather reports.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<WeatherReport, WeatherError>;
}

// == QWeather Payloads ==
#[derive(Debug, Deserialize)]
struct NowResponse {
    code: String,
    now: Option<NowPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NowPayload {
    pub obs_time: String,
    pub temp: String,
    pub feels_like: String,
    pub icon: String,
    pub text: String,
    pub wind_dir: String,
    pub wind_speed: String,
    pub humidity: String,
    pub pressure: String,
    pub vis: String,
    #[serde(default)]
    pub uv: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    code: String,
    #[serde(default)]
    daily: Vec<DailyPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyPayload {
    pub fx_date: String,
    pub temp_max: String,
    pub temp_min: String,
    pub icon_day: String,
    pub text_day: String,
    #[serde(default)]
    pub precip: Option<String>,
    pub wind_speed_day: String,
}

// == QWeather Provider ==
/// Client for the QWeather v7 API (`/weather/now` and `/weather/7d`).
#[derive(Debug, Clone)]
pub struct QWeatherProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl QWeatherProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn request<T: DeserializeOwned>(&self, path: &str, location: &Location) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, city = %location.city, "requesting weather");

        let body = self
            .client
            .get(&url)
            .query(&[
                ("location", location.query()),
                ("key", self.api_key.clone()),
                ("lang", "en".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for QWeatherProvider {
    async fn fetch(&self, location: &Location) -> Result<WeatherReport, WeatherError> {
        let now: NowResponse = self.request("weather/now", location).await?;
        ensure_ok(&now.code)?;
        let daily: DailyResponse = self.request("weather/7d", location).await?;
        ensure_ok(&daily.code)?;

        let current = now
            .now
            .ok_or_else(|| WeatherError::Malformed("missing `now` block".to_string()))?;
        build_report(&location.city, &current, &daily.daily)
    }
}

fn ensure_ok(code: &str) -> Result<(), WeatherError> {
    if code == "200" {
        Ok(())
    } else {
        Err(WeatherError::Api {
            code: code.to_string(),
        })
    }
}

// == Report Assembly ==
/// Converts provider payloads into a `WeatherReport`.
pub(crate) fn build_report(
    city: &str,
    current: &NowPayload,
    daily: &[DailyPayload],
) -> Result<WeatherReport, WeatherError> {
    let forecast = daily
        .iter()
        .take(FORECAST_DAYS)
        .map(|day| -> Result<DailyForecast, WeatherError> {
            Ok(DailyForecast {
                date: day.fx_date.clone(),
                day_of_week: day_of_week(&day.fx_date),
                high: parse_int("tempMax", &day.temp_max)?,
                low: parse_int("tempMin", &day.temp_min)?,
                condition: normalize_condition(&day.text_day),
                condition_code: day.icon_day.clone(),
                rainfall: day
                    .precip
                    .as_deref()
                    .map(|p| parse_float("precip", p))
                    .transpose()?
                    .unwrap_or(0.0),
                wind_speed: parse_int("windSpeedDay", &day.wind_speed_day)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherReport {
        temperature: parse_int("temp", &current.temp)?,
        condition: normalize_condition(&current.text),
        condition_code: current.icon.clone(),
        humidity: parse_int("humidity", &current.humidity)?,
        wind_speed: parse_int("windSpeed", &current.wind_speed)?,
        wind_direction: wind_direction(&current.wind_dir),
        visibility: parse_int("vis", &current.vis)?,
        pressure: parse_int("pressure", &current.pressure)?,
        uv_index: current
            .uv
            .as_deref()
            .map(|uv| parse_int("uv", uv))
            .transpose()?
            .unwrap_or(0),
        feels_like: parse_int("feelsLike", &current.feels_like)?,
        city: city.to_string(),
        update_time: current.obs_time.clone(),
        forecast,
    })
}

fn parse_float(field: &str, raw: &str) -> Result<f64, WeatherError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| WeatherError::Malformed(format!("{} = {:?}", field, raw)))
}

fn parse_int(field: &str, raw: &str) -> Result<i32, WeatherError> {
    parse_float(field, raw).map(|value| value.round() as i32)
}
