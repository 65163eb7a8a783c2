//! Forecast cache
//!
//! This module keeps normalized forecasts in memory, keyed by the resolved
//! upstream query. Entries younger than the soft TTL are served directly;
//! older ones trigger a refresh, with the previous payload served when the
//! refresh fails, up to the hard TTL. A background sweep drops entries past
//! the hard TTL.

mod entry;
mod manager;
mod store;
mod sweeper;

pub use entry::{
    classify, CacheEntry, CacheKey, CachePolicy, Clock, Freshness, SystemClock, DEFAULT_HARD_TTL,
    DEFAULT_SOFT_TTL,
};
pub use manager::{CacheResult, CacheStatus, ForecastCache};
pub use store::ForecastStore;
pub use sweeper::{SweepHandle, DEFAULT_SWEEP_INTERVAL};
