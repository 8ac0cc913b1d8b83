//! Indoor climate acquisition service.
//!
//! Periodically samples a BME680-class environmental sensor, derives an
//! air-quality percentage from the calibrated gas baseline, appends each
//! sample to an append-only Postgres time series and serves a small
//! read-only HTTP API for display clients.

pub mod air_quality;
pub mod api;
pub mod calibration;
pub mod config;
pub mod db;
pub mod reading_cache;
pub mod sampler;
pub mod sensor;
pub mod store;
