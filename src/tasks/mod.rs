//! Background refresh tasks
//!
//! One loop wakes on `refresh.interval_secs`, checks each feed's cache entry,
//! and refetches whatever has expired. Fetched payloads land in both the TTL
//! cache (so restarts don't hammer the upstreams) and the in-memory
//! [`LiveData`] the API serves from. A failed fetch keeps the last good data.
//!
//! The loop re-reads the active region every cycle, so a region change
//! through the settings API takes effect on the next tick without a restart.
//! A second loop sweeps expired cache entries off disk.

use chrono::Duration as ChronoDuration;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::acquisition::SeismicQuery;
use crate::regions;
use crate::state::AppState;
use crate::types::{BuoyReport, ForecastBundle, Location, SeismicReport, StormReport};

/// Cache key for a forecast at the given coordinates.
pub fn weather_key(location: Location) -> String {
    format!(
        "weather:{:.2},{:.2}",
        location.latitude, location.longitude
    )
}

/// Cache key for the NHC active-storm summary (global, not per-region).
pub const STORMS_KEY: &str = "storms:active";

/// Cache key for the seismic feed centered on the given coordinates.
pub fn seismic_key(location: Location) -> String {
    format!(
        "seismic:{:.2},{:.2}",
        location.latitude, location.longitude
    )
}

/// Cache key for one NDBC station.
pub fn buoy_key(station_id: &str) -> String {
    format!("buoys:{station_id}")
}

fn minutes(m: u64) -> ChronoDuration {
    ChronoDuration::minutes(m as i64)
}

/// Run the feed refresh loop until cancelled.
pub async fn run_refresh_loop(state: AppState, cancel: CancellationToken) {
    let interval_secs = state.config.refresh.interval_secs;
    info!(interval_secs, "Refresh loop started");

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    if !state.config.refresh.on_start {
        // Consume the immediate first tick so the first cycle waits a full
        // interval.
        ticker.tick().await;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Refresh loop received shutdown signal");
                return;
            }
            _ = ticker.tick() => {
                refresh_cycle(&state).await;
            }
        }
    }
}

/// One pass over every feed. Exposed for the demo binary, which wants a
/// single synchronous fill instead of a running loop.
pub async fn refresh_cycle(state: &AppState) {
    debug!(region = state.active_region().id, "Refresh cycle");
    refresh_forecast(state).await;
    refresh_storms(state).await;
    refresh_seismic(state).await;
    refresh_buoys(state).await;
}

async fn refresh_forecast(state: &AppState) {
    let location = state.site_location();
    let key = weather_key(location);

    if let Some(hit) = state.cache.get::<ForecastBundle>(&key) {
        let mut data = state.data.write().await;
        let behind = data.forecast.as_ref().map_or(true, |f| {
            f.location != hit.value.location || f.fetched_at != hit.value.fetched_at
        });
        if behind {
            debug!(key = %key, "Forecast restored from cache");
            data.forecast = Some(hit.value);
        }
        return;
    }

    let days = state.config.forecast.days;
    match state.forecast_source.fetch_forecast(location, days).await {
        Ok(bundle) => {
            let ttl = minutes(state.config.cache.weather_ttl_minutes);
            if let Err(e) = state.cache.put(&key, &bundle, ttl) {
                warn!(key = %key, error = %e, "Forecast cache write failed");
            }
            info!(
                source = %bundle.source,
                hours = bundle.hourly.len(),
                latitude = location.latitude,
                longitude = location.longitude,
                "Forecast refreshed"
            );
            state.data.write().await.forecast = Some(bundle);
        }
        Err(e) => {
            warn!(error = %e, "Forecast refresh failed, keeping last data");
        }
    }
}

async fn refresh_storms(state: &AppState) {
    if let Some(hit) = state.cache.get::<StormReport>(STORMS_KEY) {
        let mut data = state.data.write().await;
        let behind = data
            .storms
            .as_ref()
            .map_or(true, |s| s.fetched_at != hit.value.fetched_at);
        if behind {
            data.storms = Some(hit.value);
        }
        return;
    }

    match state.nhc.fetch_active_storms().await {
        Ok(report) => {
            let ttl = minutes(state.config.cache.storms_ttl_minutes);
            if let Err(e) = state.cache.put(STORMS_KEY, &report, ttl) {
                warn!(error = %e, "Storm cache write failed");
            }
            info!(active = report.storms.len(), "Storm advisories refreshed");
            state.data.write().await.storms = Some(report);
        }
        Err(e) => {
            warn!(error = %e, "Storm refresh failed, keeping last data");
        }
    }
}

async fn refresh_seismic(state: &AppState) {
    let location = state.site_location();
    let key = seismic_key(location);

    if let Some(hit) = state.cache.get::<SeismicReport>(&key) {
        let mut data = state.data.write().await;
        let behind = data
            .seismic
            .as_ref()
            .map_or(true, |s| s.fetched_at != hit.value.fetched_at);
        if behind {
            data.seismic = Some(hit.value);
        }
        return;
    }

    let query = SeismicQuery::around(location);
    match state.usgs.fetch_recent(&query).await {
        Ok(report) => {
            let ttl = minutes(state.config.cache.seismic_ttl_minutes);
            if let Err(e) = state.cache.put(&key, &report, ttl) {
                warn!(key = %key, error = %e, "Seismic cache write failed");
            }
            info!(events = report.count, "Seismic feed refreshed");
            state.data.write().await.seismic = Some(report);
        }
        Err(e) => {
            warn!(error = %e, "Seismic refresh failed, keeping last data");
        }
    }
}

async fn refresh_buoys(state: &AppState) {
    let region = state.active_region();
    let stations = regions::buoy_stations_for(region.id);
    let ttl = minutes(state.config.cache.buoys_ttl_minutes);

    let mut fresh: Vec<BuoyReport> = Vec::with_capacity(stations.len());
    for station in stations {
        let key = buoy_key(station.id);
        if let Some(hit) = state.cache.get::<BuoyReport>(&key) {
            fresh.push(hit.value);
            continue;
        }

        match state.ndbc.fetch_station(station.id).await {
            Ok(report) => {
                if let Err(e) = state.cache.put(&key, &report, ttl) {
                    warn!(station = station.id, error = %e, "Buoy cache write failed");
                }
                info!(
                    station = station.id,
                    rows = report.observations.len(),
                    "Buoy observations refreshed"
                );
                fresh.push(report);
            }
            Err(e) => {
                warn!(station = station.id, error = %e, "Buoy refresh failed, keeping last data");
            }
        }
    }

    let mut data = state.data.write().await;
    // Drop stations that left the active region's list.
    data.buoys
        .retain(|id, _| stations.iter().any(|s| s.id == id.as_str()));
    for report in fresh {
        data.buoys.insert(report.station_id.clone(), report);
    }
}

/// Evict expired cache entries on a fixed interval until cancelled.
pub async fn run_cache_sweeper(state: AppState, cancel: CancellationToken) {
    let interval_minutes = state.config.cache.sweep_interval_minutes;
    info!(interval_minutes, "Cache sweeper started");

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_minutes * 60));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Cache sweeper received shutdown signal");
                return;
            }
            _ = ticker.tick() => {
                match state.cache.sweep_expired() {
                    Ok(0) => {}
                    Ok(removed) => info!(removed, "Swept expired cache entries"),
                    Err(e) => warn!(error = %e, "Cache sweep failed"),
                }
            }
        }
    }
}
