//! Citycast - weather aggregation API
//!
//! Serves Open-Meteo forecasts through a stale-while-revalidate cache and
//! stores favorite cities per device.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use citycast::cache::{ForecastCache, ForecastStore, SweepHandle};
use citycast::cli::{Cli, ServerConfig};
use citycast::data::{FavoritesStore, GeocodingClient, WeatherClient};
use citycast::server::{self, AppState};

/// Installs the log subscriber; `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::from_cli(&cli)?;

    init_tracing(config.debug);
    info!("Starting citycast");

    let favorites = match &config.db_path {
        Some(path) => FavoritesStore::open(path),
        None => FavoritesStore::open_default(),
    }
    .context("Failed to open favorites database")?;

    let forecasts = Arc::new(ForecastCache::new(
        Arc::new(ForecastStore::new()),
        Arc::new(WeatherClient::new()?),
        config.policy,
    ));
    let sweeper = SweepHandle::spawn(forecasts.clone(), config.sweep_interval);

    let state = Arc::new(AppState {
        forecasts,
        geocoder: Arc::new(GeocodingClient::new()?),
        favorites: Arc::new(favorites),
        default_place: config.default_place.clone(),
        timezone: config.timezone.clone(),
    });

    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    let app = server::router(state, config.static_dir.as_deref());
    let (_addr, task) = server::start_server(app, &config.host, config.port, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received, exiting");
    })
    .await?;

    task.await??;
    sweeper.shutdown().await;

    Ok(())
}
