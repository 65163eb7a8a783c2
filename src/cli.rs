//! Command-line interface parsing for citycast
//!
//! This module handles parsing of CLI arguments (with environment variable
//! fallbacks) using clap, and turns them into a validated [`ServerConfig`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::cache::{CachePolicy, DEFAULT_HARD_TTL, DEFAULT_SOFT_TTL, DEFAULT_SWEEP_INTERVAL};
use crate::data::{ForecastQuery, Place, QueryError};

/// Error types for configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// The soft TTL must be positive and shorter than the hard TTL
    #[error("Invalid cache TTLs: soft TTL ({soft}s) must be positive and shorter than hard TTL ({hard}s)")]
    InvalidTtl { soft: u64, hard: u64 },

    /// The sweep interval must be positive
    #[error("Invalid sweep interval: must be at least one second")]
    InvalidSweepInterval,

    /// The default location is not a valid coordinate pair
    #[error("Invalid default location: {0}")]
    InvalidDefaultLocation(#[from] QueryError),
}

/// Citycast - weather aggregation API
#[derive(Parser, Debug)]
#[command(name = "citycast")]
#[command(about = "Weather API serving cached Open-Meteo forecasts and per-device favorites")]
#[command(version)]
pub struct Cli {
    /// Address to bind to
    #[arg(long, env = "CITYCAST_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Latitude used when a request names no city or coordinates
    #[arg(long, env = "DEFAULT_LAT", default_value_t = 22.3193, allow_negative_numbers = true)]
    pub default_lat: f64,

    /// Longitude used when a request names no city or coordinates
    #[arg(long, env = "DEFAULT_LON", default_value_t = 114.1694, allow_negative_numbers = true)]
    pub default_lon: f64,

    /// Display name of the default location
    #[arg(long, env = "DEFAULT_NAME", default_value = "Hong Kong")]
    pub default_name: String,

    /// Country of the default location
    #[arg(long, env = "DEFAULT_COUNTRY", default_value = "China")]
    pub default_country: String,

    /// Timezone sent to the forecast provider ("auto" resolves from coordinates)
    #[arg(long, env = "TIMEZONE", default_value = "auto")]
    pub timezone: String,

    /// Age in seconds after which cached forecasts are refreshed
    #[arg(long, env = "CACHE_SOFT_TTL_SECS", default_value_t = DEFAULT_SOFT_TTL.as_secs())]
    pub soft_ttl_secs: u64,

    /// Age in seconds after which cached forecasts are never served
    #[arg(long, env = "CACHE_HARD_TTL_SECS", default_value_t = DEFAULT_HARD_TTL.as_secs())]
    pub hard_ttl_secs: u64,

    /// Seconds between sweeps of expired cache entries
    #[arg(long, env = "CACHE_SWEEP_SECS", default_value_t = DEFAULT_SWEEP_INTERVAL.as_secs())]
    pub sweep_interval_secs: u64,

    /// Favorites database file (defaults to the platform data directory)
    #[arg(long, env = "CITYCAST_DB")]
    pub db_path: Option<PathBuf>,

    /// Directory of static browser assets to serve
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

/// Validated server configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Location served when a request names none
    pub default_place: Place,
    pub timezone: String,
    pub policy: CachePolicy,
    pub sweep_interval: Duration,
    pub db_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub debug: bool,
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with validated settings
    /// * `Err(CliError)` if the TTLs, sweep interval or default location are invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.soft_ttl_secs == 0 || cli.soft_ttl_secs >= cli.hard_ttl_secs {
            return Err(CliError::InvalidTtl {
                soft: cli.soft_ttl_secs,
                hard: cli.hard_ttl_secs,
            });
        }
        if cli.sweep_interval_secs == 0 {
            return Err(CliError::InvalidSweepInterval);
        }

        // Validate the default coordinates the same way request coordinates are
        ForecastQuery::new(cli.default_lat, cli.default_lon, &cli.timezone)?;

        Ok(ServerConfig {
            host: cli.host.clone(),
            port: cli.port,
            default_place: Place {
                lat: cli.default_lat,
                lon: cli.default_lon,
                name: cli.default_name.clone(),
                country: Some(cli.default_country.clone()).filter(|c| !c.is_empty()),
            },
            timezone: cli.timezone.clone(),
            policy: CachePolicy {
                soft_ttl: Duration::from_secs(cli.soft_ttl_secs),
                hard_ttl: Duration::from_secs(cli.hard_ttl_secs),
            },
            sweep_interval: Duration::from_secs(cli.sweep_interval_secs),
            db_path: cli.db_path.clone(),
            static_dir: cli.static_dir.clone(),
            debug: cli.debug,
        })
    }
}
