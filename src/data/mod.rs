//! Core data models for citycast
//!
//! This module contains the normalized forecast types served to clients, plus
//! the upstream clients (forecast, geocoding) and the favorites store.

pub mod favorites;
pub mod geocoding;
pub mod weather;

pub use favorites::{Favorite, FavoritesError, FavoritesStore};
pub use geocoding::{GeocodeError, Geocoder, GeocodingClient, Place};
pub use weather::{condition_text, ForecastQuery, ForecastSource, QueryError, UpstreamError, WeatherClient};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifies the upstream provider in every payload
pub const PAYLOAD_SOURCE: &str = "open-meteo";

/// Number of hourly positions kept after normalization
pub const HOURLY_HORIZON: usize = 24;

/// Normalized forecast for one location
///
/// Built once per successful upstream fetch and never mutated afterwards; the
/// cache shares it behind an `Arc` and the route layer labels a clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    /// Upstream provider name
    pub source: String,
    /// Conditions at the time of the request
    pub current: CurrentConditions,
    /// Up to 24 hourly positions, in upstream order
    pub hourly: Vec<HourlyForecast>,
    /// Daily summaries, in upstream order
    pub daily: Vec<DailyForecast>,
}

impl ForecastPayload {
    /// Returns a copy of this payload with the display label attached
    pub fn labelled(&self, city: impl Into<String>) -> Self {
        let mut payload = self.clone();
        payload.current.city = Some(city.into());
        payload
    }
}

/// Weather conditions at a specific time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Current temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// WMO weather code
    pub condition_code: i32,
    /// Human-readable condition
    pub condition_text: String,
    /// Whether the sun is up at the location
    pub is_day: bool,
    /// Observation time in the location's timezone
    pub time: NaiveDateTime,
    /// Display label, attached by the route layer
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub city: Option<String>,
}

/// Hourly weather forecast data for a single hour
///
/// Values the provider leaves null (typically at the end of a model's
/// horizon) stay `None` and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    /// Time of the forecast
    pub time: NaiveDateTime,
    /// Temperature in Celsius
    pub temp: Option<f64>,
    /// Relative humidity percentage (0-100)
    pub humidity: Option<u8>,
    /// Precipitation in mm
    pub precipitation: Option<f64>,
    /// WMO weather code
    pub condition_code: Option<i32>,
    /// Human-readable condition
    pub condition_text: String,
}

/// Daily forecast summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// Calendar date in the location's timezone
    pub date: NaiveDate,
    /// Minimum temperature in Celsius
    pub min: Option<f64>,
    /// Maximum temperature in Celsius
    pub max: Option<f64>,
    /// Total precipitation in mm
    pub precipitation_sum: Option<f64>,
    /// WMO weather code
    pub condition_code: Option<i32>,
    /// Human-readable condition
    pub condition_text: String,
}
