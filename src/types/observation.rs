//! Normalized forecast observations

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Hourly Observation
// ============================================================================

/// One normalized forecast hour.
///
/// Every field except `time` is optional: `None` means "no data for this
/// hour" and must never be conflated with zero. Units follow the upstream
/// contract — wind km/h, wave/swell meters, visibility meters, pressure
/// hPa, temperature °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyObservation {
    /// Forecast hour (UTC); strictly increasing across a series.
    pub time: DateTime<Utc>,

    // === Marine fields ===
    /// Significant wave height (m)
    #[serde(default)]
    pub wave_height: Option<f64>,
    /// Swell component height (m)
    #[serde(default)]
    pub swell_height: Option<f64>,
    /// Wind-wave component height (m)
    #[serde(default)]
    pub wind_wave_height: Option<f64>,
    /// Wave period (s)
    #[serde(default)]
    pub wave_period: Option<f64>,
    /// Mean wave direction (°)
    #[serde(default)]
    pub wave_direction: Option<f64>,

    // === Atmospheric fields ===
    /// 10 m wind speed (km/h)
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// 10 m wind gusts (km/h)
    #[serde(default)]
    pub wind_gusts: Option<f64>,
    /// 10 m wind direction (°)
    #[serde(default)]
    pub wind_direction: Option<f64>,
    /// Visibility (m)
    #[serde(default)]
    pub visibility: Option<f64>,
    /// Mean sea-level pressure (hPa)
    #[serde(default)]
    pub pressure: Option<f64>,
    /// 2 m air temperature (°C)
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl HourlyObservation {
    /// A bare observation at `time` with every data field empty.
    pub fn empty(time: DateTime<Utc>) -> Self {
        Self {
            time,
            wave_height: None,
            swell_height: None,
            wind_wave_height: None,
            wave_period: None,
            wave_direction: None,
            wind_speed: None,
            wind_gusts: None,
            wind_direction: None,
            visibility: None,
            pressure: None,
            temperature: None,
        }
    }
}

// ============================================================================
// Daily aggregates (report/summary data, not evaluator input)
// ============================================================================

/// Daily marine aggregate as delivered by the forecast provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMarine {
    pub date: NaiveDate,
    #[serde(default)]
    pub wave_height_max: Option<f64>,
}

/// Daily atmospheric aggregate as delivered by the forecast provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAtmospheric {
    pub date: NaiveDate,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub wind_speed_max: Option<f64>,
}

/// Daily aggregates from both forecast endpoints, kept for reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyAggregates {
    pub marine: Vec<DailyMarine>,
    pub atmospheric: Vec<DailyAtmospheric>,
}

// ============================================================================
// Forecast bundle
// ============================================================================

/// Geographic point a forecast was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A complete fetched forecast: the normalized hourly series plus daily
/// aggregates and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBundle {
    pub location: Location,
    pub fetched_at: DateTime<Utc>,
    /// Provider tag, e.g. `open-meteo` or `synthetic`.
    pub source: String,
    pub hourly: Vec<HourlyObservation>,
    #[serde(default)]
    pub daily: DailyAggregates,
}

impl ForecastBundle {
    /// The observation for "now": the first hour of the series.
    pub fn current(&self) -> Option<&HourlyObservation> {
        self.hourly.first()
    }
}
