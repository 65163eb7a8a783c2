//! HTTP server implementation using Axum.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    http::Method,
    routing::{delete, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::ForecastCache;
use crate::data::{FavoritesStore, Geocoder, Place};
use crate::routes::{self, favorites, weather};

/// Application state shared across handlers.
pub struct AppState {
    /// Cached forecast lookups
    pub forecasts: Arc<ForecastCache>,
    /// City name resolution
    pub geocoder: Arc<dyn Geocoder>,
    pub favorites: Arc<FavoritesStore>,
    /// Served when a request names no location
    pub default_place: Place,
    pub timezone: String,
}

/// Build the application router.
///
/// Paths outside `/api` are served from `static_dir` when given, with
/// `index.html` answering anything that doesn't match a file.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/weather", get(weather::get_weather))
        .route("/weather/test", get(weather::self_test))
        .route("/favorites", get(favorites::list).post(favorites::add))
        .route("/favorites/:id", delete(favorites::remove))
        .fallback(routes::api_not_found);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health))
        .nest("/api", api);

    let app = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            app.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => app.fallback(routes::api_not_found),
    };

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0)
/// and the task serving requests until `shutdown` resolves.
pub async fn start_server(
    app: Router,
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<(SocketAddr, JoinHandle<std::io::Result<()>>)> {
    let listener = TcpListener::bind((host, port)).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on http://{}", actual_addr);

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    });

    Ok((actual_addr, task))
}
