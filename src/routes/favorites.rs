//! Per-device favorite cities

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::ApiError;
use crate::data::FavoritesError;
use crate::server::AppState;

pub const DEVICE_TOKEN_HEADER: &str = "x-device-token";

/// Body of `POST /api/favorites`
#[derive(Debug, Deserialize)]
pub struct NewFavorite {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

fn device_token(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(DEVICE_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::MissingDeviceToken)
}

/// Runs a SQLite call on the blocking pool
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, FavoritesError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Favorites task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// `GET /api/favorites`
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = device_token(&headers)?;
    let store = state.favorites.clone();
    let items = blocking(move || store.list(&token)).await?;

    Ok(Json(json!({ "items": items })))
}

/// `POST /api/favorites`
pub async fn add(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<NewFavorite>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let token = device_token(&headers)?;
    let Json(body) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let city = body.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let (city, lat, lon) = match (city, body.lat, body.lon) {
        (Some(city), Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
            (city.to_string(), lat, lon)
        }
        _ => return Err(ApiError::InvalidRequest("city/lat/lon required".to_string())),
    };

    let store = state.favorites.clone();
    blocking(move || store.add(&token, &city, lat, lon)).await?;

    Ok((StatusCode::CREATED, Json(json!({ "ok": true }))))
}

/// `DELETE /api/favorites/:id`
///
/// Succeeds whether or not the id belonged to this device.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let token = device_token(&headers)?;
    let Path(id) = id.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let store = state.favorites.clone();
    blocking(move || store.remove(id, &token)).await?;

    Ok(Json(json!({ "ok": true })))
}
