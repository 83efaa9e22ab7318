//! API route table.

use axum::routing::{get, patch, post, put};
use axum::Router;

use super::handlers;
use crate::state::AppState;

/// Build the versioned API router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Forecast + windows
        .route("/forecast", get(handlers::get_forecast))
        .route("/current", get(handlers::get_current))
        .route("/operations/status", get(handlers::get_operations_status))
        .route("/operations/windows", get(handlers::get_all_windows))
        .route(
            "/operations/:operation/windows",
            get(handlers::get_operation_windows),
        )
        // Environment feeds
        .route("/environment/storms", get(handlers::get_storms))
        .route("/environment/seismic", get(handlers::get_seismic))
        .route("/environment/buoys", get(handlers::get_buoys))
        .route("/environment/buoys/:station", get(handlers::get_buoy))
        // Region catalog
        .route("/regions", get(handlers::get_regions))
        .route("/regions/:id", get(handlers::get_region))
        // Settings
        .route("/settings", get(handlers::get_settings))
        .route("/settings/region", put(handlers::put_region))
        .route("/settings/units", put(handlers::put_units))
        .route("/settings/thresholds", patch(handlers::patch_thresholds))
        .route(
            "/settings/thresholds/reset",
            post(handlers::reset_thresholds),
        )
        // Exports
        .route("/reports/weather.csv", get(handlers::weather_csv))
        .route("/reports/windows/:operation", get(handlers::windows_csv))
        .route("/reports/buoys/:station", get(handlers::buoy_csv))
        .route("/reports/forecast.html", get(handlers::forecast_html))
        // System
        .route("/status", get(handlers::get_status))
        .route("/cache/clear", post(handlers::clear_cache))
        .with_state(state)
}

/// Unversioned probes at the root level.
pub fn legacy_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
