//! Test doubles shared by unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::cache::Clock;
use crate::data::{
    CurrentConditions, ForecastPayload, ForecastQuery, ForecastSource, GeocodeError, Geocoder, Place,
    UpstreamError, PAYLOAD_SOURCE,
};

/// A payload whose current temperature identifies it
pub fn sample_payload(temperature: f64) -> ForecastPayload {
    ForecastPayload {
        source: PAYLOAD_SOURCE.to_string(),
        current: CurrentConditions {
            temperature,
            feels_like: temperature + 1.5,
            humidity: 70,
            wind_speed: 9.0,
            condition_code: 3,
            condition_text: "Overcast".to_string(),
            is_day: true,
            time: NaiveDateTime::parse_from_str("2024-07-15T12:00", "%Y-%m-%dT%H:%M")
                .expect("valid fixture time"),
            city: None,
        },
        hourly: vec![],
        daily: vec![],
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(
                Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0)
                    .single()
                    .expect("valid fixture instant"),
            ),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Forecast source that replays queued outcomes and counts calls
pub struct ScriptedSource {
    calls: AtomicUsize,
    responses: Mutex<VecDeque<Option<ForecastPayload>>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(VecDeque::new()),
            delay: Mutex::new(None),
        }
    }

    pub fn push_ok(&self, payload: ForecastPayload) {
        self.responses.lock().push_back(Some(payload));
    }

    /// Queue a 503 from upstream
    pub fn push_err(&self) {
        self.responses.lock().push_back(None);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastSource for ScriptedSource {
    async fn fetch_forecast(&self, _query: &ForecastQuery) -> Result<ForecastPayload, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().pop_front();
        match next {
            Some(Some(payload)) => Ok(payload),
            Some(None) => Err(UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE)),
            None => Err(UpstreamError::MissingField("no scripted response".to_string())),
        }
    }
}

/// Geocoder backed by a fixed table of places
#[derive(Default)]
pub struct StaticGeocoder {
    places: HashMap<String, Place>,
}

impl StaticGeocoder {
    pub fn with_place(mut self, city: &str, lat: f64, lon: f64, country: &str) -> Self {
        self.places.insert(
            city.to_lowercase(),
            Place {
                lat,
                lon,
                name: city.to_string(),
                country: Some(country.to_string()),
            },
        );
        self
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn locate(&self, city: &str) -> Result<Place, GeocodeError> {
        self.places
            .get(&city.to_lowercase())
            .cloned()
            .ok_or_else(|| GeocodeError::NotFound(city.to_string()))
    }
}
