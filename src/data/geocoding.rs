//! Forward geocoding: convert a city name into coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Geocoding has its own, shorter latency budget than forecasts
pub const GEOCODING_TIMEOUT: Duration = Duration::from_secs(5);

/// A resolved place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub country: Option<String>,
}

impl Place {
    /// Display label, e.g. "Hong Kong, China"
    pub fn label(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("City not found: {0}")]
    NotFound(String),
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Resolves free-text city names
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, city: &str) -> Result<Place, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

impl GeocodingClient {
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_endpoint(GEOCODING_URL, GEOCODING_TIMEOUT)
    }

    pub fn with_endpoint(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Look up the best match for `city`.
    /// Returns `NotFound` when the search has no results.
    pub async fn search(&self, city: &str) -> Result<Place, GeocodeError> {
        let body: SearchResponse = self
            .client
            .get(&self.base_url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let first = body
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| GeocodeError::NotFound(city.to_string()))?;

        tracing::debug!("Geocoded {:?} to {}, {}", city, first.latitude, first.longitude);

        Ok(Place {
            lat: first.latitude,
            lon: first.longitude,
            name: first.name,
            country: first.country,
        })
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn locate(&self, city: &str) -> Result<Place, GeocodeError> {
        self.search(city).await
    }
}
