//! Shared application state
//!
//! One `AppState` is built at startup and cloned into every handler and
//! background task (all fields are cheap handles). Mutable pieces follow
//! their access pattern: thresholds sit behind an [`ArcSwap`] so the
//! evaluation path never takes a lock, while the fetched environment data
//! lives under an async `RwLock` written only by the refresh tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use tokio::sync::RwLock;
use tracing::info;

use crate::acquisition::{
    build_http_client, ForecastSource, NdbcSource, NhcSource, OpenMeteoSource, UsgsSource,
};
use crate::config::AppConfig;
use crate::regions::{self, Region};
use crate::storage::{CacheStore, SettingsStore, StorageError, Store};
use crate::types::{
    BuoyReport, ForecastBundle, Location, SeismicReport, StormReport, Thresholds,
};

/// Latest successfully fetched environment data, kept in memory so the API
/// can keep serving through upstream outages. Each report carries its own
/// `fetched_at` for staleness display.
#[derive(Debug, Default)]
pub struct LiveData {
    pub forecast: Option<ForecastBundle>,
    pub storms: Option<StormReport>,
    pub seismic: Option<SeismicReport>,
    /// Keyed by NDBC station id.
    pub buoys: HashMap<String, BuoyReport>,
}

/// Shared handles for API handlers and background tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub cache: CacheStore,
    pub settings: SettingsStore,
    thresholds: Arc<ArcSwap<Thresholds>>,
    pub data: Arc<RwLock<LiveData>>,
    pub forecast_source: Arc<dyn ForecastSource>,
    pub nhc: Arc<NhcSource>,
    pub usgs: Arc<UsgsSource>,
    pub ndbc: Arc<NdbcSource>,
    started_at: Instant,
}

impl AppState {
    /// Wire up state from loaded config and an open store. Seeds the
    /// stored region on first run and installs the persisted thresholds.
    pub fn new(config: AppConfig, store: Store) -> Result<Self, StorageError> {
        let cache = store.cache()?;
        let settings = store.settings()?;
        settings.seed_region(&config.site.region)?;

        let stored = settings.load();
        info!(
            region = %stored.region,
            "State initialized with persisted settings"
        );

        let http = build_http_client(&config.http);
        Ok(Self {
            config: Arc::new(config),
            store,
            cache,
            settings,
            thresholds: Arc::new(ArcSwap::from_pointee(stored.thresholds)),
            data: Arc::new(RwLock::new(LiveData::default())),
            forecast_source: Arc::new(OpenMeteoSource::new(http.clone())),
            nhc: Arc::new(NhcSource::new(http.clone())),
            usgs: Arc::new(UsgsSource::new(http.clone())),
            ndbc: Arc::new(NdbcSource::new(http)),
            started_at: Instant::now(),
        })
    }

    /// Swap in a different forecast provider (demo mode uses the synthetic
    /// generator instead of Open-Meteo).
    pub fn with_forecast_source(mut self, source: Arc<dyn ForecastSource>) -> Self {
        self.forecast_source = source;
        self
    }

    /// Current threshold registry snapshot. Cheap; safe to hold across
    /// an evaluation pass — later updates produce new snapshots instead
    /// of mutating this one.
    pub fn thresholds(&self) -> Arc<Thresholds> {
        self.thresholds.load_full()
    }

    /// Install a new threshold registry (after a persisted patch/reset).
    pub fn install_thresholds(&self, thresholds: Thresholds) {
        self.thresholds.store(Arc::new(thresholds));
    }

    /// The region selected at runtime (falls back to the default when the
    /// stored id is unknown).
    pub fn active_region(&self) -> &'static Region {
        regions::region_or_default(&self.settings.load().region)
    }

    /// Where to fetch forecasts for. Explicit coordinates from the config
    /// apply only while the active region is still the configured one;
    /// switching regions at runtime moves to that region's anchor point.
    pub fn site_location(&self) -> Location {
        let region = self.active_region();
        if region.id == self.config.site.region {
            self.config.site_location()
        } else {
            region.location()
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
