//! Cache keys, entries and the freshness classifier
//!
//! Freshness is a pure function of an entry's age and the [`CachePolicy`], so
//! the TTL rules can be tested against synthetic timestamps without any I/O.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::data::{ForecastPayload, ForecastQuery};

/// Default age after which an entry is refreshed before being served
pub const DEFAULT_SOFT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default age after which an entry may no longer be served
pub const DEFAULT_HARD_TTL: Duration = Duration::from_secs(15 * 60);

/// Identity of one upstream forecast request
///
/// Built from the resolved query only. Coordinates are compared bit-for-bit,
/// which is exact because [`ForecastQuery`] already folds `-0.0` and rejects NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    latitude: u64,
    longitude: u64,
    timezone: String,
}

impl From<&ForecastQuery> for CacheKey {
    fn from(query: &ForecastQuery) -> Self {
        Self {
            latitude: query.latitude().to_bits(),
            longitude: query.longitude().to_bits(),
            timezone: query.timezone().to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}@{}",
            f64::from_bits(self.latitude),
            f64::from_bits(self.longitude),
            self.timezone
        )
    }
}

/// A payload together with the moment it was obtained from upstream
///
/// Entries are immutable; the store replaces the whole `Arc<CacheEntry>` on
/// refresh so readers never see a half-written entry.
#[derive(Debug)]
pub struct CacheEntry {
    /// The normalized forecast
    pub payload: Arc<ForecastPayload>,
    /// When upstream produced the payload
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(payload: Arc<ForecastPayload>, fetched_at: DateTime<Utc>) -> Self {
        Self { payload, fetched_at }
    }

    /// Age of the entry at `now`; a `fetched_at` in the future counts as zero
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Soft and hard expiry thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Entries at least this old trigger a refresh attempt
    pub soft_ttl: Duration,
    /// Entries at least this old are never served
    pub hard_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            soft_ttl: DEFAULT_SOFT_TTL,
            hard_ttl: DEFAULT_HARD_TTL,
        }
    }
}

/// Where an entry sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No entry for the key
    Missing,
    /// Younger than the soft TTL
    Fresh,
    /// Between the soft and hard TTL
    StaleSoft,
    /// At or past the hard TTL
    Expired,
}

/// Classify an entry at `now` under `policy`
pub fn classify(entry: Option<&CacheEntry>, now: DateTime<Utc>, policy: &CachePolicy) -> Freshness {
    let Some(entry) = entry else {
        return Freshness::Missing;
    };

    let age = entry.age(now);
    if age >= policy.hard_ttl {
        Freshness::Expired
    } else if age >= policy.soft_ttl {
        Freshness::StaleSoft
    } else {
        Freshness::Fresh
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
