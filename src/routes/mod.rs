//! HTTP route handlers and the JSON error body they share.

pub mod favorites;
pub mod weather;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::data::{FavoritesError, GeocodeError, QueryError, UpstreamError};

/// Errors a route can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("X-Device-Token header is required")]
    MissingDeviceToken,

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Coordinates(#[from] QueryError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("Forecast unavailable: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Favorites storage failed: {0}")]
    Favorites(#[from] FavoritesError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingDeviceToken => (StatusCode::BAD_REQUEST, "MISSING_DEVICE_TOKEN"),
            ApiError::InvalidRequest(_) | ApiError::Coordinates(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST")
            }
            ApiError::Geocode(GeocodeError::NotFound(_)) => (StatusCode::NOT_FOUND, "CITY_NOT_FOUND"),
            ApiError::Geocode(GeocodeError::Request(_)) | ApiError::Upstream(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            ApiError::Favorites(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("{} {}: {}", status.as_u16(), code, self);
        } else {
            warn!("{} {}: {}", status.as_u16(), code, self);
        }

        (status, Json(json!({ "error": code, "detail": self.to_string() }))).into_response()
    }
}

/// Fallback for unknown `/api` paths
pub async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// Liveness check
pub async fn health() -> &'static str {
    "Citycast API is up. Try GET /api/weather?city=Hong%20Kong"
}
