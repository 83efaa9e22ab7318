//! Environment feed handlers: tropical storms, seismic events, buoys, regions

use axum::extract::{Path, State};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::acquisition::{nhc, usgs};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::regions::{self, BuoyStation, Platform, Region};
use crate::state::AppState;
use crate::types::{BuoyReport, Earthquake, Storm};

/// One tracked storm with its display label resolved server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StormEntry {
    #[serde(flatten)]
    pub storm: Storm,
    pub category_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StormsView {
    pub storms: Vec<StormEntry>,
    pub fetched_at: DateTime<Utc>,
    pub source: String,
}

/// GET /api/v1/environment/storms — latest active-storm report.
pub async fn get_storms(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let Some(report) = data.storms.as_ref() else {
        return ApiErrorResponse::service_unavailable("Storm data not yet fetched");
    };

    let storms = report
        .storms
        .iter()
        .map(|storm| StormEntry {
            category_label: nhc::category_label(&storm.storm_type, storm.category),
            storm: storm.clone(),
        })
        .collect();

    ApiResponse::ok(StormsView {
        storms,
        fetched_at: report.fetched_at,
        source: report.source.clone(),
    })
}

/// One seismic event with its magnitude class.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuakeEntry {
    #[serde(flatten)]
    pub quake: Earthquake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude_label: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeismicView {
    pub count: usize,
    pub earthquakes: Vec<QuakeEntry>,
    pub fetched_at: DateTime<Utc>,
    pub source: String,
}

/// GET /api/v1/environment/seismic — latest seismic report.
pub async fn get_seismic(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let Some(report) = data.seismic.as_ref() else {
        return ApiErrorResponse::service_unavailable("Seismic data not yet fetched");
    };

    let earthquakes = report
        .earthquakes
        .iter()
        .map(|quake| QuakeEntry {
            magnitude_label: quake.magnitude.map(usgs::magnitude_label),
            quake: quake.clone(),
        })
        .collect();

    ApiResponse::ok(SeismicView {
        count: report.count,
        earthquakes,
        fetched_at: report.fetched_at,
        source: report.source.clone(),
    })
}

/// One buoy station of the active region with its latest report, when any
/// fetch has succeeded yet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationEntry {
    #[serde(flatten)]
    pub station: BuoyStation,
    pub report: Option<BuoyReport>,
}

/// GET /api/v1/environment/buoys — every station of the active region.
pub async fn get_buoys(State(state): State<AppState>) -> Response {
    let region = state.active_region();
    let data = state.data.read().await;

    let entries: Vec<StationEntry> = regions::buoy_stations_for(region.id)
        .iter()
        .map(|&station| StationEntry {
            station,
            report: data.buoys.get(station.id).cloned(),
        })
        .collect();

    ApiResponse::ok(entries)
}

/// GET /api/v1/environment/buoys/:station — one station's observations.
pub async fn get_buoy(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> Response {
    let region = state.active_region();
    let known = regions::buoy_stations_for(region.id)
        .iter()
        .any(|s| s.id == station);
    if !known {
        return ApiErrorResponse::not_found(format!(
            "No station '{station}' in region '{}'",
            region.id
        ));
    }

    let data = state.data.read().await;
    match data.buoys.get(&station) {
        Some(report) => ApiResponse::ok(report.clone()),
        None => ApiErrorResponse::service_unavailable(format!(
            "Station '{station}' not yet fetched"
        )),
    }
}

/// GET /api/v1/regions — all supported regions.
pub async fn get_regions() -> Response {
    ApiResponse::ok(regions::REGIONS)
}

/// Full context for one region.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetail {
    #[serde(flatten)]
    pub region: &'static Region,
    pub platforms: &'static [Platform],
    pub buoy_stations: &'static [BuoyStation],
}

/// GET /api/v1/regions/:id — one region with its platforms and stations.
pub async fn get_region(Path(id): Path<String>) -> Response {
    match regions::region(&id) {
        Some(region) => ApiResponse::ok(RegionDetail {
            region,
            platforms: regions::platforms_for(region.id),
            buoy_stations: regions::buoy_stations_for(region.id),
        }),
        None => {
            let valid: Vec<&str> = regions::REGIONS.iter().map(|r| r.id).collect();
            ApiErrorResponse::not_found(format!(
                "Unknown region '{id}'. Valid regions: {}",
                valid.join(", ")
            ))
        }
    }
}
