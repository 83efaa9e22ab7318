//! Environmental situational data: storms, earthquakes, buoy observations
//!
//! Display data for the dashboard; none of these types feed the window
//! evaluation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Tropical storms (NHC)
// ============================================================================

/// Current movement of a tracked storm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StormMovement {
    /// Heading (°)
    pub direction: Option<f64>,
    /// Forward speed (kt)
    pub speed: Option<f64>,
}

/// Current intensity of a tracked storm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StormIntensity {
    /// Maximum sustained wind (kt)
    pub wind_speed: Option<f64>,
    /// Minimum central pressure (mb)
    pub pressure: Option<f64>,
}

/// Last advisory position of a tracked storm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StormPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// One active tropical system from the NHC feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storm {
    /// Basin code + storm number, e.g. `AL09`.
    pub id: String,
    pub name: String,
    /// Basin slug: atlantic, epac, cpac, wpac, nio, aus.
    pub basin: String,
    /// Advisory storm type code, e.g. `HU`, `TS`, `TD`.
    #[serde(rename = "type")]
    pub storm_type: String,
    /// Saffir–Simpson category; `None` when intensity is unknown.
    #[serde(default)]
    pub category: Option<u8>,
    #[serde(default)]
    pub advisory_number: Option<String>,
    #[serde(default)]
    pub movement: StormMovement,
    #[serde(default)]
    pub intensity: StormIntensity,
    #[serde(default)]
    pub position: Option<StormPosition>,
}

/// Snapshot of all active storms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StormReport {
    pub storms: Vec<Storm>,
    pub fetched_at: DateTime<Utc>,
    pub source: String,
}

// ============================================================================
// Earthquakes (USGS)
// ============================================================================

/// One seismic event from the USGS FDSN feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    pub id: String,
    #[serde(default)]
    pub magnitude: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    pub latitude: f64,
    pub longitude: f64,
    /// Hypocenter depth (km)
    #[serde(default)]
    pub depth_km: Option<f64>,
    pub tsunami: bool,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// PAGER alert level (green/yellow/orange/red) when issued.
    #[serde(default)]
    pub alert: Option<String>,
    /// USGS significance score.
    #[serde(default)]
    pub significance: Option<i64>,
}

/// Snapshot of recent seismic activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeismicReport {
    pub count: usize,
    pub earthquakes: Vec<Earthquake>,
    pub fetched_at: DateTime<Utc>,
    pub source: String,
}

// ============================================================================
// Buoy observations (NDBC)
// ============================================================================

/// One NDBC standard meteorological observation row.
///
/// Units are native NDBC: wind m/s, visibility nautical miles. Buoy data is
/// observational display data and never enters the threshold evaluator, so
/// no normalization happens at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuoyObservation {
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub wind_direction: Option<f64>,
    /// Wind speed (m/s)
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// Gust speed (m/s)
    #[serde(default)]
    pub wind_gusts: Option<f64>,
    /// Significant wave height (m)
    #[serde(default)]
    pub wave_height: Option<f64>,
    /// Dominant wave period (s)
    #[serde(default)]
    pub dominant_period: Option<f64>,
    /// Average wave period (s)
    #[serde(default)]
    pub average_period: Option<f64>,
    #[serde(default)]
    pub mean_wave_direction: Option<f64>,
    /// Sea-level pressure (hPa)
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Air temperature (°C)
    #[serde(default)]
    pub air_temp: Option<f64>,
    /// Water temperature (°C)
    #[serde(default)]
    pub water_temp: Option<f64>,
    #[serde(default)]
    pub dewpoint: Option<f64>,
    /// Visibility (nmi)
    #[serde(default)]
    pub visibility: Option<f64>,
}

/// Parsed realtime2 feed for one station, newest observation first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuoyReport {
    pub station_id: String,
    pub fetched_at: DateTime<Utc>,
    pub source: String,
    pub observations: Vec<BuoyObservation>,
    #[serde(default)]
    pub latest: Option<BuoyObservation>,
}
