//! Forecast and weather-window handlers

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::engine::{
    bands_for, compute_windows, is_within_limits, summarize_operations,
    windows_for_all_operations, LimitBands,
};
use crate::state::AppState;
use crate::types::{
    ForecastBundle, GoStatus, HourlyObservation, OperationType, WeatherWindow,
};

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    /// Truncate the hourly series to the first N hours.
    pub hours: Option<usize>,
}

/// GET /api/v1/forecast — the latest fetched forecast bundle.
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Response {
    let data = state.data.read().await;
    let Some(bundle) = data.forecast.as_ref() else {
        return ApiErrorResponse::service_unavailable("Forecast not yet fetched");
    };

    match query.hours {
        Some(hours) if hours < bundle.hourly.len() => {
            let mut truncated = bundle.clone();
            truncated.hourly.truncate(hours);
            ApiResponse::ok(truncated)
        }
        _ => ApiResponse::ok(bundle.clone()),
    }
}

/// GET /api/v1/operations/status — go/no-go per operation for the current hour.
pub async fn get_operations_status(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let current = data.forecast.as_ref().and_then(ForecastBundle::current);
    ApiResponse::ok(summarize_operations(current, &state.thresholds()))
}

/// How close the current hour sits to one operation's limits.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationAssessment {
    pub key: OperationType,
    pub name: String,
    pub status: GoStatus,
    pub bands: LimitBands,
}

/// Current-hour dashboard payload: the newest forecast observation plus a
/// per-operation verdict with threshold proximity for banding.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub conditions: HourlyObservation,
    pub assessments: Vec<OperationAssessment>,
}

/// GET /api/v1/current — current conditions with threshold proximity.
pub async fn get_current(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let Some(current) = data.forecast.as_ref().and_then(ForecastBundle::current) else {
        return ApiErrorResponse::service_unavailable("Forecast not yet fetched");
    };

    let thresholds = state.thresholds();
    let assessments: Vec<OperationAssessment> = OperationType::ALL
        .iter()
        .map(|&op| match thresholds.limits_for(op) {
            Some(limits) => OperationAssessment {
                key: op,
                name: op.display_name().to_string(),
                status: if is_within_limits(current, limits) {
                    GoStatus::Go
                } else {
                    GoStatus::NoGo
                },
                bands: bands_for(current, limits),
            },
            None => OperationAssessment {
                key: op,
                name: op.display_name().to_string(),
                status: GoStatus::Unknown,
                bands: LimitBands::default(),
            },
        })
        .collect();

    ApiResponse::ok(CurrentConditions {
        conditions: current.clone(),
        assessments,
    })
}

/// Windows plus the planning hint for one operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationWindows {
    pub operation: OperationType,
    pub name: String,
    /// Advisory minimum useful duration; windows below it are still listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_window_hours: Option<u32>,
    pub windows: Vec<WeatherWindow>,
}

/// GET /api/v1/operations/windows — windows for every operation type.
pub async fn get_all_windows(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let Some(bundle) = data.forecast.as_ref() else {
        return ApiErrorResponse::service_unavailable("Forecast not yet fetched");
    };

    let thresholds = state.thresholds();
    let entries: Vec<OperationWindows> = windows_for_all_operations(&bundle.hourly, &thresholds)
        .into_iter()
        .map(|(op, windows)| OperationWindows {
            operation: op,
            name: op.display_name().to_string(),
            min_window_hours: thresholds.limits_for(op).and_then(|l| l.min_window_hours),
            windows,
        })
        .collect();

    ApiResponse::ok(entries)
}

/// GET /api/v1/operations/:operation/windows — windows for one operation.
pub async fn get_operation_windows(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Response {
    let Some(op) = OperationType::from_key(&operation) else {
        return ApiErrorResponse::bad_request(unknown_operation(&operation));
    };

    let data = state.data.read().await;
    let Some(bundle) = data.forecast.as_ref() else {
        return ApiErrorResponse::service_unavailable("Forecast not yet fetched");
    };

    let thresholds = state.thresholds();
    ApiResponse::ok(OperationWindows {
        operation: op,
        name: op.display_name().to_string(),
        min_window_hours: thresholds.limits_for(op).and_then(|l| l.min_window_hours),
        windows: compute_windows(&bundle.hourly, &thresholds, op),
    })
}

pub(super) fn unknown_operation(key: &str) -> String {
    let valid: Vec<&str> = OperationType::ALL.iter().map(|op| op.key()).collect();
    format!(
        "Unknown operation '{key}'. Valid operations: {}",
        valid.join(", ")
    )
}
