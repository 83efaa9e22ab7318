//! Persisted-settings handlers
//!
//! Threshold changes write through to sled and then swap the in-memory
//! snapshot, so an evaluation running concurrently finishes against the
//! registry it started with.

use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use tracing::info;

use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::regions;
use crate::state::AppState;
use crate::types::ThresholdsPatch;
use crate::units::UnitsPatch;

/// GET /api/v1/settings — the full persisted settings document.
pub async fn get_settings(State(state): State<AppState>) -> Response {
    ApiResponse::ok(state.settings.load())
}

#[derive(Debug, Deserialize)]
pub struct RegionUpdate {
    pub region: String,
}

/// PUT /api/v1/settings/region — switch the active region.
pub async fn put_region(
    State(state): State<AppState>,
    axum::Json(update): axum::Json<RegionUpdate>,
) -> Response {
    if regions::region(&update.region).is_none() {
        let valid: Vec<&str> = regions::REGIONS.iter().map(|r| r.id).collect();
        return ApiErrorResponse::bad_request(format!(
            "Unknown region '{}'. Valid regions: {}",
            update.region,
            valid.join(", ")
        ));
    }

    match state.settings.set_region(&update.region) {
        Ok(settings) => {
            info!(region = %update.region, "Active region changed");
            ApiResponse::ok(settings)
        }
        Err(e) => ApiErrorResponse::internal(format!("Failed to persist region: {e}")),
    }
}

/// PUT /api/v1/settings/units — partial unit-preference update.
pub async fn put_units(
    State(state): State<AppState>,
    axum::Json(patch): axum::Json<UnitsPatch>,
) -> Response {
    match state.settings.set_units(patch) {
        Ok(settings) => ApiResponse::ok(settings),
        Err(e) => ApiErrorResponse::internal(format!("Failed to persist units: {e}")),
    }
}

/// PATCH /api/v1/settings/thresholds — merge a partial threshold update.
///
/// Present fields overwrite, absent fields keep their stored value;
/// clearing a limit entirely is only possible via reset.
pub async fn patch_thresholds(
    State(state): State<AppState>,
    axum::Json(patch): axum::Json<ThresholdsPatch>,
) -> Response {
    match state.settings.apply_thresholds_patch(patch) {
        Ok(updated) => {
            state.install_thresholds(updated.clone());
            info!("Thresholds updated");
            ApiResponse::ok(updated)
        }
        Err(e) => ApiErrorResponse::internal(format!("Failed to persist thresholds: {e}")),
    }
}

/// POST /api/v1/settings/thresholds/reset — restore shipped defaults.
pub async fn reset_thresholds(State(state): State<AppState>) -> Response {
    match state.settings.reset_thresholds() {
        Ok(defaults) => {
            state.install_thresholds(defaults.clone());
            info!("Thresholds reset to defaults");
            ApiResponse::ok(defaults)
        }
        Err(e) => ApiErrorResponse::internal(format!("Failed to reset thresholds: {e}")),
    }
}
