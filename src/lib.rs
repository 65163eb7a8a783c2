//! Citycast Library
//!
//! Weather aggregation API: geocodes city names, serves Open-Meteo forecasts
//! through a stale-while-revalidate cache, and keeps favorite cities per device.

pub mod cache;
pub mod cli;
pub mod data;
pub mod routes;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;
