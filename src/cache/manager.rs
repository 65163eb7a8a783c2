//! Stale-while-revalidate cache in front of the forecast provider
//!
//! `ForecastCache` is the only path to the upstream forecast API. For each key
//! it serves fresh entries directly, refreshes soft-stale entries (falling back
//! to the stale payload when the refresh fails), and refuses to serve anything
//! at or past the hard TTL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::{Mutex as FlightLock, MutexGuard as FlightGuard};
use tracing::{debug, info, warn};

use super::entry::{classify, CacheEntry, CacheKey, CachePolicy, Clock, Freshness, SystemClock};
use super::store::ForecastStore;
use crate::data::{ForecastPayload, ForecastQuery, ForecastSource, UpstreamError};

/// Outcome of a cache lookup
#[derive(Debug, Clone)]
pub enum CacheResult {
    /// Served from a fresh entry without calling upstream
    Cached(Arc<ForecastPayload>),
    /// Obtained from upstream during this lookup (or by a concurrent one)
    Refreshed(Arc<ForecastPayload>),
    /// Upstream refresh failed; the soft-stale payload was served instead
    StaleFallback {
        payload: Arc<ForecastPayload>,
        fetched_at: DateTime<Utc>,
    },
}

/// Coarse cache status, as reported to HTTP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Stale,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Stale => "STALE",
        }
    }
}

impl CacheResult {
    pub fn payload(&self) -> &Arc<ForecastPayload> {
        match self {
            CacheResult::Cached(payload)
            | CacheResult::Refreshed(payload)
            | CacheResult::StaleFallback { payload, .. } => payload,
        }
    }

    pub fn status(&self) -> CacheStatus {
        match self {
            CacheResult::Cached(_) => CacheStatus::Hit,
            CacheResult::Refreshed(_) => CacheStatus::Miss,
            CacheResult::StaleFallback { .. } => CacheStatus::Stale,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, CacheResult::StaleFallback { .. })
    }
}

/// Per-key coordination of upstream calls
///
/// The lock serializes attempts for one key and holds the error of the most
/// recent one, so callers that queued behind a failed attempt share its
/// outcome instead of retrying one after another.
#[derive(Default)]
struct Flight {
    /// Upstream attempts finished under this flight
    attempts: AtomicU64,
    last_error: FlightLock<Option<UpstreamError>>,
}

/// A caller's turn on a [`Flight`]
struct Turn<'a> {
    flight: &'a Flight,
    last_error: FlightGuard<'a, Option<UpstreamError>>,
    /// Failure of an attempt that finished while this caller was queued
    shared_failure: Option<UpstreamError>,
}

impl Turn<'_> {
    fn record(&mut self, outcome: Option<UpstreamError>) {
        *self.last_error = outcome;
        self.flight.attempts.fetch_add(1, Ordering::Release);
    }
}

/// Forecast cache with soft/hard expiry and per-key single-flight
pub struct ForecastCache {
    store: Arc<ForecastStore>,
    source: Arc<dyn ForecastSource>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    /// One flight per key with an upstream call in progress (or recently finished)
    flights: Mutex<HashMap<CacheKey, Arc<Flight>>>,
}

impl ForecastCache {
    /// Create a cache over `store`, fetching misses from `source`
    pub fn new(store: Arc<ForecastStore>, source: Arc<dyn ForecastSource>, policy: CachePolicy) -> Self {
        Self {
            store,
            source,
            clock: Arc::new(SystemClock),
            policy,
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<ForecastStore> {
        &self.store
    }

    /// Return the forecast for `query`
    ///
    /// Concurrent callers for one key share a single upstream call, whether
    /// it succeeds or fails.
    ///
    /// # Arguments
    /// * `query` - Resolved coordinates and timezone
    /// * `force_refresh` - Skip any cached entry and call upstream
    ///
    /// # Returns
    /// * `Ok(CacheResult)` - Fresh, refreshed or stale-fallback payload
    /// * `Err(UpstreamError)` - Upstream failed and no entry under the hard TTL exists
    ///   (or `force_refresh` was set)
    pub async fn get(&self, query: &ForecastQuery, force_refresh: bool) -> Result<CacheResult, UpstreamError> {
        let key = CacheKey::from(query);
        let seen = self.store.get(&key);

        if !force_refresh {
            if let Some(entry) = &seen {
                if classify(Some(entry), self.clock.now(), &self.policy) == Freshness::Fresh {
                    debug!("Forecast cache hit for {}", key);
                    return Ok(CacheResult::Cached(Arc::clone(&entry.payload)));
                }
            }
        }

        let flight = self.flight(&key);
        let joined_at = flight.attempts.load(Ordering::Acquire);
        let result = {
            let last_error = flight.last_error.lock().await;
            let shared_failure = if flight.attempts.load(Ordering::Acquire) > joined_at {
                last_error.clone()
            } else {
                None
            };
            let mut turn = Turn {
                flight: &flight,
                last_error,
                shared_failure,
            };
            self.resolve(query, &key, seen, force_refresh, &mut turn).await
        };
        self.release_flight(&key, flight);

        result
    }

    /// Runs with the key's flight lock held
    async fn resolve(
        &self,
        query: &ForecastQuery,
        key: &CacheKey,
        seen: Option<Arc<CacheEntry>>,
        force_refresh: bool,
        turn: &mut Turn<'_>,
    ) -> Result<CacheResult, UpstreamError> {
        let current = self.store.get(key);
        let now = self.clock.now();

        // A concurrent caller replaced the entry while we waited for the lock
        if let Some(entry) = &current {
            let replaced = seen.as_ref().map_or(true, |old| !Arc::ptr_eq(old, entry));
            if replaced && classify(Some(entry), now, &self.policy) != Freshness::Expired {
                debug!("Forecast for {} refreshed by a concurrent request", key);
                return Ok(CacheResult::Refreshed(Arc::clone(&entry.payload)));
            }
        }

        let state = if force_refresh {
            Freshness::Missing
        } else {
            classify(current.as_deref(), now, &self.policy)
        };

        match (state, current) {
            (Freshness::Fresh, Some(entry)) => Ok(CacheResult::Cached(Arc::clone(&entry.payload))),
            (Freshness::StaleSoft, Some(entry)) => {
                let refreshed = match turn.shared_failure.take() {
                    Some(err) => Err(err),
                    None => self.fetch_and_store(query, key, turn).await,
                };
                match refreshed {
                    Ok(payload) => Ok(CacheResult::Refreshed(payload)),
                    Err(err) => {
                        warn!(
                            "Serving stale forecast for {} (age {}s): {}",
                            key,
                            entry.age(now).as_secs(),
                            err
                        );
                        Ok(CacheResult::StaleFallback {
                            payload: Arc::clone(&entry.payload),
                            fetched_at: entry.fetched_at,
                        })
                    }
                }
            }
            (state, current) => {
                if let Some(err) = turn.shared_failure.take() {
                    debug!("Forecast for {} failed in a concurrent request: {}", key, err);
                    return Err(err);
                }

                debug!("Forecast cache {:?} for {}", state, key);
                match self.fetch_and_store(query, key, turn).await {
                    Ok(payload) => Ok(CacheResult::Refreshed(payload)),
                    Err(err) => {
                        // Past the hard TTL the old entry is useless even as a fallback
                        if let (Freshness::Expired, Some(entry)) = (state, &current) {
                            self.store.remove_if_same(key, entry);
                        }
                        Err(err)
                    }
                }
            }
        }
    }

    /// Call upstream once and record the outcome on the caller's turn
    async fn fetch_and_store(
        &self,
        query: &ForecastQuery,
        key: &CacheKey,
        turn: &mut Turn<'_>,
    ) -> Result<Arc<ForecastPayload>, UpstreamError> {
        let started = Instant::now();
        let payload = match self.source.fetch_forecast(query).await {
            Ok(payload) => Arc::new(payload),
            Err(err) => {
                turn.record(Some(err.clone()));
                return Err(err);
            }
        };

        self.store
            .insert(key.clone(), CacheEntry::new(Arc::clone(&payload), self.clock.now()));
        turn.record(None);
        info!(
            "Fetched forecast for {} in {}ms",
            key,
            started.elapsed().as_millis()
        );

        Ok(payload)
    }

    fn flight(&self, key: &CacheKey) -> Arc<Flight> {
        Arc::clone(self.flights.lock().entry(key.clone()).or_default())
    }

    fn release_flight(&self, key: &CacheKey, flight: Arc<Flight>) {
        let mut flights = self.flights.lock();
        // The map and this handle are the only owners: nobody is waiting
        if Arc::strong_count(&flight) == 2 {
            flights.remove(key);
        }
    }

    /// Remove entries past the hard TTL and forget idle flights
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let removed = self.store.purge_expired(self.clock.now(), self.policy.hard_ttl);
        // Flights left behind by cancelled lookups
        self.flights.lock().retain(|_, flight| Arc::strong_count(flight) > 1);
        removed
    }
}
