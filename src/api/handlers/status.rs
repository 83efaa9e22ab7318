//! System status and health endpoints

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::state::AppState;
use crate::storage::CacheStats;

/// Age bookkeeping for one data feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    /// When the last successful fetch completed.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Seconds since then.
    pub age_secs: Option<i64>,
}

impl FeedStatus {
    fn from_fetched_at(fetched_at: Option<DateTime<Utc>>) -> Self {
        Self {
            fetched_at,
            age_secs: fetched_at.map(|t| (Utc::now() - t).num_seconds()),
        }
    }
}

/// System status for the dashboard header and ops checks.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    /// Active region id.
    pub region: String,
    pub forecast_source: &'static str,
    pub forecast: FeedStatus,
    pub storms: FeedStatus,
    pub seismic: FeedStatus,
    /// Stations with at least one successful fetch.
    pub buoy_stations_fetched: usize,
    pub cache: CacheStats,
    pub storage_bytes: u64,
}

/// GET /api/v1/status — full system status.
pub async fn get_status(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;

    let response = StatusResponse {
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
        region: state.active_region().id.to_string(),
        forecast_source: state.forecast_source.source_name(),
        forecast: FeedStatus::from_fetched_at(data.forecast.as_ref().map(|b| b.fetched_at)),
        storms: FeedStatus::from_fetched_at(data.storms.as_ref().map(|r| r.fetched_at)),
        seismic: FeedStatus::from_fetched_at(data.seismic.as_ref().map(|r| r.fetched_at)),
        buoy_stations_fetched: data.buoys.len(),
        cache: state.cache.stats(),
        storage_bytes: state.store.size_on_disk(),
    };

    ApiResponse::ok(response)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClearResponse {
    pub removed: usize,
}

/// POST /api/v1/cache/clear — drop every cached upstream payload so the
/// next refresh cycle fetches fresh data.
pub async fn clear_cache(State(state): State<AppState>) -> Response {
    match state.cache.clear() {
        Ok(removed) => {
            info!(removed, "Cache cleared by request");
            ApiResponse::ok(CacheClearResponse { removed })
        }
        Err(e) => ApiErrorResponse::internal(format!("Failed to clear cache: {e}")),
    }
}

/// Minimal liveness body for the root-level `/health` probe.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

/// GET /health — unversioned liveness check (no envelope; load balancers
/// and uptime monitors want a flat body).
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
    })
}
