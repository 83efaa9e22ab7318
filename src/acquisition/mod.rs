//! Upstream data acquisition
//!
//! HTTP clients for the public data sources the dashboard consumes:
//!
//! - Open-Meteo marine + atmospheric forecasts (the evaluation input)
//! - NHC active tropical cyclones (ArcGIS GeoJSON)
//! - USGS earthquake feed (FDSN GeoJSON)
//! - NDBC buoy observations (fixed-column text)
//!
//! Plus a synthetic forecast generator for demo mode and offline work.
//!
//! All sources share one `reqwest::Client`. Fetchers normalize payloads into
//! the crate's types at the boundary; nothing upstream-shaped leaks past this
//! module.

pub mod ndbc;
pub mod nhc;
pub mod open_meteo;
pub mod synthetic;
pub mod usgs;

pub use ndbc::NdbcSource;
pub use nhc::NhcSource;
pub use open_meteo::OpenMeteoSource;
pub use synthetic::SyntheticSource;
pub use usgs::{SeismicQuery, UsgsSource};

use async_trait::async_trait;

use crate::config::HttpConfig;
use crate::types::{ForecastBundle, Location};

/// Acquisition errors
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source} returned status {status}")]
    UpstreamStatus {
        source: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Malformed {source} payload: {message}")]
    Malformed {
        source: &'static str,
        message: String,
    },
}

/// Build the shared outbound HTTP client.
///
/// One client for every source: reqwest pools connections per host under
/// the hood, and NOAA endpoints want a stable User-Agent.
pub fn build_http_client(config: &HttpConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .expect("Failed to build HTTP client")
}

/// A provider of hourly forecast series.
///
/// Implementations must be thread-safe (Send + Sync) for shared access
/// across async tasks. `Location` and horizon are per-call so one source
/// can serve any region.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch a normalized forecast bundle for the given point.
    async fn fetch_forecast(
        &self,
        location: Location,
        days: u64,
    ) -> Result<ForecastBundle, AcquisitionError>;

    /// Provider tag recorded in bundles and logs (e.g. "open-meteo").
    fn source_name(&self) -> &'static str;
}
