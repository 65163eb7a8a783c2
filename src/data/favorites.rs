//! Favorite cities per device, stored in SQLite.
//!
//! Device tokens are opaque strings supplied by the client. They scope rows but
//! are not authenticated.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use directories::ProjectDirs;
use parking_lot::Mutex;
use rusqlite::{params, types::Type, Connection};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Failed to create data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not determine data directory")]
    NoDataDir,
}

/// A saved city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Favorite {
    pub id: i64,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub created_at: DateTime<Utc>,
}

/// Schema for the favorites table.
const FAVORITES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_token TEXT NOT NULL,
    city TEXT NOT NULL,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (device_token, city)
);

CREATE INDEX IF NOT EXISTS idx_favorites_device ON favorites(device_token);
"#;

/// SQLite-backed favorites storage.
pub struct FavoritesStore {
    conn: Mutex<Connection>,
}

impl FavoritesStore {
    /// Open the store at the default location.
    pub fn open_default() -> Result<Self, FavoritesError> {
        Self::open(&Self::default_path()?)
    }

    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, FavoritesError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::from_connection(Connection::open(path)?)
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self, FavoritesError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Get the default database path.
    pub fn default_path() -> Result<PathBuf, FavoritesError> {
        let dirs = ProjectDirs::from("", "", "citycast").ok_or(FavoritesError::NoDataDir)?;
        Ok(dirs.data_dir().join("favorites.db"))
    }

    fn from_connection(conn: Connection) -> Result<Self, FavoritesError> {
        conn.execute_batch(FAVORITES_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// List a device's favorites, newest first.
    pub fn list(&self, device_token: &str) -> Result<Vec<Favorite>, FavoritesError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, city, lat, lon, created_at FROM favorites
             WHERE device_token = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![device_token], |row| {
            let created_at: String = row.get(4)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);

            Ok(Favorite {
                id: row.get(0)?,
                city: row.get(1)?,
                lat: row.get(2)?,
                lon: row.get(3)?,
                created_at,
            })
        })?;

        let favorites = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }

    /// Add a city, or update its coordinates if the device already saved it.
    pub fn add(&self, device_token: &str, city: &str, lat: f64, lon: f64) -> Result<(), FavoritesError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        self.conn.lock().execute(
            "INSERT INTO favorites (device_token, city, lat, lon, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(device_token, city) DO UPDATE SET lat = excluded.lat, lon = excluded.lon",
            params![device_token, city, lat, lon, now],
        )?;
        Ok(())
    }

    /// Remove a favorite owned by `device_token`. Returns whether a row was deleted.
    pub fn remove(&self, id: i64, device_token: &str) -> Result<bool, FavoritesError> {
        let deleted = self.conn.lock().execute(
            "DELETE FROM favorites WHERE id = ?1 AND device_token = ?2",
            params![id, device_token],
        )?;
        Ok(deleted > 0)
    }
}
