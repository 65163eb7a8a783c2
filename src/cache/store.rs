//! In-memory store of cached forecasts

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::entry::{CacheEntry, CacheKey};

/// Shared map from [`CacheKey`] to the latest [`CacheEntry`]
///
/// Constructed once at start-up and handed to the cache. Reads and writes never
/// suspend; a write swaps the whole entry.
#[derive(Debug, Default)]
pub struct ForecastStore {
    entries: RwLock<HashMap<CacheKey, Arc<CacheEntry>>>,
}

impl ForecastStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.entries.read().get(key).cloned()
    }

    /// Insert or replace the entry for `key`
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.write().insert(key, Arc::new(entry));
    }

    /// Remove `key` only if it still holds `expected`
    ///
    /// Returns `false` when the entry was already replaced or removed.
    pub fn remove_if_same(&self, key: &CacheKey, expected: &Arc<CacheEntry>) -> bool {
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(current) if Arc::ptr_eq(current, expected) => {
                entries.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Drop every entry whose age at `now` is at least `hard_ttl`
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self, now: DateTime<Utc>, hard_ttl: Duration) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.age(now) < hard_ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
