//! OffshoreWatch: offshore operations weather and safety planning
//!
//! Fetches marine forecasts and environmental feeds for offshore regions,
//! evaluates per-operation weather windows against configurable safety
//! thresholds, and serves the results over a REST API.
//!
//! ## Architecture
//!
//! - **Acquisition**: Open-Meteo / NHC / USGS / NDBC clients plus a
//!   deterministic synthetic generator for offline work
//! - **Engine**: pure threshold evaluation and window segmentation
//! - **Report**: CSV exports and the printable HTML forecast report
//! - **API**: Axum REST surface with a uniform response envelope
//! - **Storage**: sled-backed TTL cache and persisted runtime settings

pub mod acquisition;
pub mod api;
pub mod config;
pub mod engine;
pub mod regions;
pub mod report;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod types;
pub mod units;

// Re-export application configuration
pub use config::AppConfig;

// Re-export commonly used types
pub use types::{
    ForecastBundle, GoStatus, HourlyObservation, LimitSet, Location, OperationStatus,
    OperationType, Thresholds, WeatherWindow,
};

// Re-export the engine entry points
pub use engine::{
    bands_for, compute_windows, is_within_limits, proximity_band, summarize_operations,
    windows_for_all_operations,
};

// Re-export storage handles
pub use storage::{CacheStore, SettingsStore, StorageError, Store};
