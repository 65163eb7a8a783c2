//! Open-Meteo forecast API client
//!
//! This module fetches current, hourly and daily forecast data from the
//! Open-Meteo API and normalizes it into a [`ForecastPayload`]. It performs no
//! caching and no retries; [`crate::cache::ForecastCache`] sits in front of it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::{
    CurrentConditions, DailyForecast, ForecastPayload, HourlyForecast, HOURLY_HORIZON,
    PAYLOAD_SOURCE,
};

/// Base URL for the Open-Meteo forecast API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Upstream timeout; kept longer than the geocoding timeout
pub const FORECAST_TIMEOUT: Duration = Duration::from_secs(8);

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,weather_code,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Timezone sent upstream when the caller does not pick one
pub const DEFAULT_TIMEZONE: &str = "auto";

/// Errors that can occur when fetching forecast data
///
/// Cloneable so that one failed upstream call can be reported to every
/// caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// The request did not complete within the timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(StatusCode),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[source] Arc<reqwest::Error>),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[source] Arc<serde_json::Error>),

    /// Missing or inconsistent field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Request(Arc::new(err))
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Parse(Arc::new(err))
    }
}

/// Errors raised when building a [`ForecastQuery`]
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Latitude must be a finite value between -90 and 90, got {0}")]
    Latitude(f64),

    #[error("Longitude must be a finite value between -180 and 180, got {0}")]
    Longitude(f64),
}

/// The resolved inputs of one upstream forecast request
///
/// Only fields that change the upstream response belong here; display names
/// and device tokens never do.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastQuery {
    latitude: f64,
    longitude: f64,
    timezone: String,
}

impl ForecastQuery {
    /// Validates coordinates and builds a query
    ///
    /// An empty timezone becomes `"auto"`, and `-0.0` is folded to `0.0` so
    /// that equal coordinates always produce equal cache keys.
    pub fn new(latitude: f64, longitude: f64, timezone: &str) -> Result<Self, QueryError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(QueryError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(QueryError::Longitude(longitude));
        }

        let timezone = timezone.trim();
        Ok(Self {
            latitude: latitude + 0.0,
            longitude: longitude + 0.0,
            timezone: if timezone.is_empty() {
                DEFAULT_TIMEZONE.to_string()
            } else {
                timezone.to_string()
            },
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }
}

/// Anything that can produce a normalized forecast for a query
///
/// [`WeatherClient`] is the production implementation; the cache only talks to
/// this trait so it can be driven by scripted sources in tests.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<ForecastPayload, UpstreamError>;
}

/// Client for fetching forecast data from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    /// Create a new WeatherClient against the public Open-Meteo endpoint
    pub fn new() -> Result<Self, UpstreamError> {
        Self::with_endpoint(OPEN_METEO_BASE_URL, FORECAST_TIMEOUT)
    }

    /// Create a new WeatherClient with a custom endpoint and timeout
    pub fn with_endpoint(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch and normalize the forecast for the given query
    ///
    /// # Arguments
    /// * `query` - Resolved coordinates and timezone
    ///
    /// # Returns
    /// * `Ok(ForecastPayload)` - Current, hourly (max 24) and daily data
    /// * `Err(UpstreamError)` - On timeout, non-2xx status, transport or parse failure
    pub async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastPayload, UpstreamError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", query.latitude.to_string()),
                ("longitude", query.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", query.timezone.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let text = response.text().await?;
        let api_response: OpenMeteoResponse = serde_json::from_str(&text)?;

        normalize_response(api_response)
    }
}

#[async_trait]
impl ForecastSource for WeatherClient {
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<ForecastPayload, UpstreamError> {
        self.fetch(query).await
    }
}

/// Convert the raw upstream response into a payload
///
/// Either every section converts or the whole response is rejected.
fn normalize_response(response: OpenMeteoResponse) -> Result<ForecastPayload, UpstreamError> {
    Ok(ForecastPayload {
        source: PAYLOAD_SOURCE.to_string(),
        current: normalize_current(&response.current)?,
        hourly: normalize_hourly(&response.hourly, HOURLY_HORIZON)?,
        daily: normalize_daily(&response.daily)?,
    })
}

fn normalize_current(current: &CurrentWeather) -> Result<CurrentConditions, UpstreamError> {
    Ok(CurrentConditions {
        temperature: current.temperature_2m,
        feels_like: current.apparent_temperature,
        humidity: percent(current.relative_humidity_2m),
        wind_speed: current.wind_speed_10m,
        condition_code: current.weather_code,
        condition_text: condition_text(current.weather_code).to_string(),
        is_day: current.is_day != 0,
        time: parse_datetime(&current.time)?,
        city: None,
    })
}

/// Zip the hourly parallel arrays, keeping at most `horizon` positions
fn normalize_hourly(
    hourly: &HourlyWeather,
    horizon: usize,
) -> Result<Vec<HourlyForecast>, UpstreamError> {
    let len = hourly.time.len();

    // Validate that all arrays have the same length
    if hourly.temperature_2m.len() != len
        || hourly.relative_humidity_2m.len() != len
        || hourly.precipitation.len() != len
        || hourly.weather_code.len() != len
    {
        return Err(UpstreamError::MissingField(
            "hourly arrays have inconsistent lengths".to_string(),
        ));
    }

    let len = len.min(horizon);
    let mut forecasts = Vec::with_capacity(len);

    for i in 0..len {
        forecasts.push(HourlyForecast {
            time: parse_datetime(&hourly.time[i])?,
            temp: hourly.temperature_2m[i],
            humidity: hourly.relative_humidity_2m[i].map(percent),
            precipitation: hourly.precipitation[i],
            condition_code: hourly.weather_code[i],
            condition_text: optional_condition_text(hourly.weather_code[i]).to_string(),
        });
    }

    Ok(forecasts)
}

fn normalize_daily(daily: &DailyWeather) -> Result<Vec<DailyForecast>, UpstreamError> {
    let len = daily.time.len();

    if daily.temperature_2m_min.len() != len
        || daily.temperature_2m_max.len() != len
        || daily.precipitation_sum.len() != len
        || daily.weather_code.len() != len
    {
        return Err(UpstreamError::MissingField(
            "daily arrays have inconsistent lengths".to_string(),
        ));
    }

    (0..len)
        .map(|i| {
            Ok(DailyForecast {
                date: parse_date(&daily.time[i])?,
                min: daily.temperature_2m_min[i],
                max: daily.temperature_2m_max[i],
                precipitation_sum: daily.precipitation_sum[i],
                condition_code: daily.weather_code[i],
                condition_text: optional_condition_text(daily.weather_code[i]).to_string(),
            })
        })
        .collect()
}

fn percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Parse a datetime string in ISO 8601 format (e.g., "2024-07-15T05:30") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, UpstreamError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M")
        .map_err(|_| UpstreamError::InvalidTimeFormat(datetime_str.to_string()))
}

/// Parse a date string (e.g., "2024-07-15") to NaiveDate
fn parse_date(date_str: &str) -> Result<NaiveDate, UpstreamError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| UpstreamError::InvalidTimeFormat(date_str.to_string()))
}

fn optional_condition_text(code: Option<i32>) -> &'static str {
    code.map_or(UNKNOWN_CONDITION, condition_text)
}

const UNKNOWN_CONDITION: &str = "Unknown";

/// Map a WMO weather code to its display text
///
/// The table is closed: codes outside it read as `"Unknown"`.
pub fn condition_text(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        80 => "Rain showers",
        _ => UNKNOWN_CONDITION,
    }
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current: CurrentWeather,
    hourly: HourlyWeather,
    daily: DailyWeather,
}

/// Current weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    is_day: u8,
    weather_code: i32,
    wind_speed_10m: f64,
}

/// Hourly weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct HourlyWeather {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Build an Open-Meteo style body with `hours` hourly positions and `days` daily positions
    pub(crate) fn sample_body(hours: usize, days: usize) -> Value {
        let hourly_time: Vec<String> = (0..hours)
            .map(|i| format!("2024-07-{:02}T{:02}:00", 15 + i / 24, i % 24))
            .collect();
        let daily_time: Vec<String> = (0..days).map(|i| format!("2024-07-{:02}", 15 + i)).collect();
        let hourly_temps: Vec<f64> = (0..hours).map(|i| 25.0 + i as f64 * 0.1).collect();
        let hourly_codes: Vec<i32> = (0..hours).map(|i| if i % 2 == 0 { 61 } else { 3 }).collect();

        json!({
            "latitude": 22.3,
            "longitude": 114.17,
            "timezone": "Asia/Hong_Kong",
            "current": {
                "time": "2024-07-15T14:00",
                "interval": 900,
                "temperature_2m": 31.2,
                "relative_humidity_2m": 74,
                "apparent_temperature": 36.5,
                "is_day": 1,
                "weather_code": 2,
                "wind_speed_10m": 11.3
            },
            "hourly": {
                "time": hourly_time,
                "temperature_2m": hourly_temps,
                "relative_humidity_2m": vec![80; hours],
                "precipitation": vec![0.4; hours],
                "weather_code": hourly_codes
            },
            "daily": {
                "time": daily_time,
                "weather_code": vec![63; days],
                "temperature_2m_max": vec![32.5; days],
                "temperature_2m_min": vec![27.1; days],
                "precipitation_sum": vec![12.6; days]
            }
        })
    }

    fn parse_body(body: Value) -> OpenMeteoResponse {
        serde_json::from_value(body).expect("Failed to parse sample response")
    }

    #[test]
    fn test_timeout_budgets() {
        use crate::data::geocoding::GEOCODING_TIMEOUT;

        assert_eq!(FORECAST_TIMEOUT, Duration::from_secs(8));
        assert_eq!(GEOCODING_TIMEOUT, Duration::from_secs(5));
        assert!(FORECAST_TIMEOUT > GEOCODING_TIMEOUT);
    }

    #[test]
    fn test_condition_text_table() {
        let table = [
            (0, "Clear sky"),
            (1, "Mainly clear"),
            (2, "Partly cloudy"),
            (3, "Overcast"),
            (45, "Fog"),
            (48, "Rime fog"),
            (51, "Light drizzle"),
            (53, "Moderate drizzle"),
            (55, "Dense drizzle"),
            (61, "Slight rain"),
            (63, "Moderate rain"),
            (65, "Heavy rain"),
            (71, "Slight snow"),
            (80, "Rain showers"),
        ];

        for (code, text) in table {
            assert_eq!(condition_text(code), text, "code {}", code);
        }
    }

    #[test]
    fn test_condition_text_unknown_codes() {
        // Real WMO codes that are not in the table still read as unknown
        for code in [-1, 4, 73, 95, 99, 100, 255, i32::MAX] {
            assert_eq!(condition_text(code), "Unknown", "code {}", code);
        }
    }

    #[test]
    fn test_normalize_full_response() {
        let payload = normalize_response(parse_body(sample_body(24, 7)))
            .expect("Failed to normalize response");

        assert_eq!(payload.source, "open-meteo");
        assert!((payload.current.temperature - 31.2).abs() < 0.01);
        assert!((payload.current.feels_like - 36.5).abs() < 0.01);
        assert_eq!(payload.current.humidity, 74);
        assert!((payload.current.wind_speed - 11.3).abs() < 0.01);
        assert_eq!(payload.current.condition_code, 2);
        assert_eq!(payload.current.condition_text, "Partly cloudy");
        assert!(payload.current.is_day);
        assert!(payload.current.city.is_none());

        assert_eq!(payload.hourly.len(), 24);
        assert_eq!(payload.hourly[0].condition_text, "Slight rain");
        assert_eq!(payload.hourly[1].condition_text, "Overcast");

        assert_eq!(payload.daily.len(), 7);
        assert_eq!(payload.daily[0].date, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        assert!((payload.daily[0].min.unwrap() - 27.1).abs() < 0.01);
        assert!((payload.daily[0].max.unwrap() - 32.5).abs() < 0.01);
        assert_eq!(payload.daily[6].condition_text, "Moderate rain");
    }

    #[test]
    fn test_hourly_truncated_to_horizon() {
        let payload = normalize_response(parse_body(sample_body(30, 7)))
            .expect("Failed to normalize response");

        assert_eq!(payload.hourly.len(), 24);
        // Positions 0-23 are kept in upstream order
        for (i, hour) in payload.hourly.iter().enumerate() {
            assert!((hour.temp.unwrap() - (25.0 + i as f64 * 0.1)).abs() < 0.001, "position {}", i);
        }
        assert_eq!(
            payload.hourly[23].time,
            NaiveDateTime::parse_from_str("2024-07-15T23:00", "%Y-%m-%dT%H:%M").unwrap()
        );
    }

    #[test]
    fn test_hourly_shorter_than_horizon_is_kept_whole() {
        let payload = normalize_response(parse_body(sample_body(5, 1)))
            .expect("Failed to normalize response");
        assert_eq!(payload.hourly.len(), 5);
    }

    #[test]
    fn test_night_flag() {
        let mut body = sample_body(1, 1);
        body["current"]["is_day"] = json!(0);
        let payload = normalize_response(parse_body(body)).expect("Failed to normalize response");
        assert!(!payload.current.is_day);
    }

    #[test]
    fn test_unknown_current_code_does_not_fail() {
        let mut body = sample_body(1, 1);
        body["current"]["weather_code"] = json!(96);
        let payload = normalize_response(parse_body(body)).expect("Failed to normalize response");
        assert_eq!(payload.current.condition_code, 96);
        assert_eq!(payload.current.condition_text, "Unknown");
    }

    #[test]
    fn test_null_forecast_values_pass_through() {
        let mut body = sample_body(3, 2);
        body["hourly"]["temperature_2m"][2] = Value::Null;
        body["hourly"]["relative_humidity_2m"][2] = Value::Null;
        body["hourly"]["weather_code"][2] = Value::Null;
        body["daily"]["temperature_2m_max"][1] = Value::Null;
        body["daily"]["precipitation_sum"][1] = Value::Null;

        let payload = normalize_response(parse_body(body)).expect("nulls should not fail the fetch");

        let last_hour = &payload.hourly[2];
        assert!(last_hour.temp.is_none());
        assert!(last_hour.humidity.is_none());
        assert!(last_hour.condition_code.is_none());
        assert_eq!(last_hour.condition_text, "Unknown");
        assert!((last_hour.precipitation.unwrap() - 0.4).abs() < 0.001);
        assert_eq!(payload.hourly[0].humidity, Some(80));

        assert!(payload.daily[1].max.is_none());
        assert!(payload.daily[1].precipitation_sum.is_none());
        assert_eq!(payload.daily[1].condition_text, "Moderate rain");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["hourly"][2]["temp"].is_null());
    }

    #[test]
    fn test_inconsistent_hourly_lengths_rejected() {
        let mut body = sample_body(3, 1);
        body["hourly"]["precipitation"] = json!([0.0]);

        match normalize_response(parse_body(body)) {
            Err(UpstreamError::MissingField(msg)) => assert!(msg.contains("hourly")),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_inconsistent_daily_lengths_rejected() {
        let mut body = sample_body(3, 2);
        body["daily"]["temperature_2m_min"] = json!([20.0]);

        match normalize_response(parse_body(body)) {
            Err(UpstreamError::MissingField(msg)) => assert!(msg.contains("daily")),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_time_rejects_whole_response() {
        let mut body = sample_body(3, 1);
        body["hourly"]["time"][2] = json!("not a time");

        assert!(matches!(
            normalize_response(parse_body(body)),
            Err(UpstreamError::InvalidTimeFormat(_))
        ));
    }

    #[test]
    fn test_parse_missing_sections() {
        let missing_daily = json!({ "current": sample_body(1, 1)["current"].clone() });
        let result: Result<OpenMeteoResponse, _> = serde_json::from_value(missing_daily);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_rejects_out_of_range_coordinates() {
        assert_eq!(ForecastQuery::new(91.0, 0.0, "auto"), Err(QueryError::Latitude(91.0)));
        assert_eq!(ForecastQuery::new(0.0, -181.0, "auto"), Err(QueryError::Longitude(-181.0)));
        assert!(ForecastQuery::new(f64::NAN, 0.0, "auto").is_err());
        assert!(ForecastQuery::new(0.0, f64::INFINITY, "auto").is_err());
    }

    #[test]
    fn test_query_defaults_timezone_and_folds_negative_zero() {
        let query = ForecastQuery::new(-0.0, 12.5, "  ").expect("valid query");
        assert_eq!(query.timezone(), "auto");
        assert!(query.latitude().is_sign_positive());
    }

    #[tokio::test]
    async fn test_fetch_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "22.3"))
            .and(query_param("longitude", "114.17"))
            .and(query_param("timezone", "Asia/Hong_Kong"))
            .and(query_param("current", CURRENT_FIELDS))
            .and(query_param("hourly", HOURLY_FIELDS))
            .and(query_param("daily", DAILY_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body(48, 7)))
            .expect(1)
            .mount(&server)
            .await;

        let client = WeatherClient::with_endpoint(
            format!("{}/v1/forecast", server.uri()),
            FORECAST_TIMEOUT,
        )
        .expect("Failed to build client");
        let query = ForecastQuery::new(22.3, 114.17, "Asia/Hong_Kong").unwrap();

        let payload = client.fetch(&query).await.expect("Fetch should succeed");
        assert_eq!(payload.hourly.len(), 24);
        assert_eq!(payload.daily.len(), 7);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = WeatherClient::with_endpoint(server.uri(), FORECAST_TIMEOUT).unwrap();
        let query = ForecastQuery::new(1.0, 2.0, "auto").unwrap();

        match client.fetch(&query).await {
            Err(UpstreamError::Status(status)) => assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE),
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(sample_body(1, 1))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = WeatherClient::with_endpoint(server.uri(), Duration::from_millis(100)).unwrap();
        let query = ForecastQuery::new(1.0, 2.0, "auto").unwrap();

        assert!(matches!(client.fetch(&query).await, Err(UpstreamError::Timeout)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ invalid json }"))
            .mount(&server)
            .await;

        let client = WeatherClient::with_endpoint(server.uri(), FORECAST_TIMEOUT).unwrap();
        let query = ForecastQuery::new(1.0, 2.0, "auto").unwrap();

        assert!(matches!(client.fetch(&query).await, Err(UpstreamError::Parse(_))));
    }
}
