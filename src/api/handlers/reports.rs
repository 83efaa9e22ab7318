//! Export handlers: CSV downloads and the printable HTML report

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};

use crate::api::envelope::{download, ApiErrorResponse};
use crate::engine::compute_windows;
use crate::report;
use crate::state::AppState;
use crate::types::OperationType;

use super::forecast::unknown_operation;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// GET /api/v1/reports/weather.csv — hourly forecast download.
pub async fn weather_csv(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let Some(bundle) = data.forecast.as_ref() else {
        return ApiErrorResponse::service_unavailable("Forecast not yet fetched");
    };

    let region = state.active_region();
    download(
        report::weather_csv(bundle),
        CSV_CONTENT_TYPE,
        &report::weather_filename(region.id),
    )
}

/// GET /api/v1/reports/windows/:operation.csv — window list download.
pub async fn windows_csv(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Response {
    let key = operation.strip_suffix(".csv").unwrap_or(&operation);
    let Some(op) = OperationType::from_key(key) else {
        return ApiErrorResponse::bad_request(unknown_operation(key));
    };

    let data = state.data.read().await;
    let Some(bundle) = data.forecast.as_ref() else {
        return ApiErrorResponse::service_unavailable("Forecast not yet fetched");
    };

    let region = state.active_region();
    let windows = compute_windows(&bundle.hourly, &state.thresholds(), op);
    download(
        report::windows_csv(&windows, op, region.name),
        CSV_CONTENT_TYPE,
        &report::windows_filename(op),
    )
}

/// GET /api/v1/reports/buoys/:station.csv — station observations download.
pub async fn buoy_csv(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> Response {
    let id = station.strip_suffix(".csv").unwrap_or(&station);
    let data = state.data.read().await;
    let Some(buoy_report) = data.buoys.get(id) else {
        return ApiErrorResponse::service_unavailable(format!(
            "Station '{id}' not yet fetched"
        ));
    };

    download(
        report::buoy_csv(buoy_report),
        CSV_CONTENT_TYPE,
        &report::buoy_filename(id),
    )
}

/// GET /api/v1/reports/forecast.html — printable report, rendered inline.
pub async fn forecast_html(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let Some(bundle) = data.forecast.as_ref() else {
        return ApiErrorResponse::service_unavailable("Forecast not yet fetched");
    };

    let region = state.active_region();
    Html(report::forecast_report(bundle, region.name, &state.thresholds())).into_response()
}
