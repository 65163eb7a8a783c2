//! Forecast routes

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::ApiError;
use crate::data::{ForecastQuery, Place};
use crate::server::AppState;

/// Query string of `GET /api/weather`
#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub refresh: Option<String>,
}

impl WeatherParams {
    fn force_refresh(&self) -> bool {
        matches!(
            self.refresh.as_deref().map(str::trim),
            Some("1") | Some("true") | Some("yes")
        )
    }
}

/// `GET /api/weather/test`
pub async fn self_test() -> impl IntoResponse {
    Json(json!({ "message": "Weather API is running" }))
}

/// `GET /api/weather`
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let place = resolve_place(&state, &params).await?;
    let query = ForecastQuery::new(place.lat, place.lon, &state.timezone)?;
    debug!("Weather request for {}", place.label());

    let result = state.forecasts.get(&query, params.force_refresh()).await?;
    let payload = result.payload().labelled(place.label());

    Ok(([("x-cache", result.status().as_str())], Json(payload)).into_response())
}

/// Picks the location a request refers to: a city name first, then explicit
/// coordinates, then the configured default.
async fn resolve_place(state: &AppState, params: &WeatherParams) -> Result<Place, ApiError> {
    if let Some(city) = params.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        return Ok(state.geocoder.locate(city).await?);
    }

    match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Ok(Place {
            lat,
            lon,
            name: format!("{:.4}, {:.4}", lat, lon),
            country: None,
        }),
        (None, None) => Ok(state.default_place.clone()),
        _ => Err(ApiError::InvalidRequest(
            "lat and lon must be given together".to_string(),
        )),
    }
}
