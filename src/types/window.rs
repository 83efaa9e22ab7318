//! Weather windows: contiguous safe spans of a forecast series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::HourlyObservation;

/// Per-hour field snapshot carried inside a window, in series order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowHour {
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub wave_height: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_gusts: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl From<&HourlyObservation> for WindowHour {
    fn from(obs: &HourlyObservation) -> Self {
        Self {
            time: obs.time,
            wave_height: obs.wave_height,
            wind_speed: obs.wind_speed,
            wind_gusts: obs.wind_gusts,
            visibility: obs.visibility,
        }
    }
}

/// A maximal contiguous run of forecast hours all evaluated safe for one
/// operation type.
///
/// Transient output of the segmentation engine: computed per call, consumed
/// by API and export layers, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherWindow {
    /// Timestamp of the first safe hour.
    pub start_time: DateTime<Utc>,
    /// Timestamp of the last safe hour (equals `start_time` for a
    /// single-hour window).
    pub end_time: DateTime<Utc>,
    /// 0-based offset of the first safe hour in the source series.
    pub start_index: usize,
    /// Count of hours in the run — an index span, not wall-clock elapsed
    /// time if the series has gaps.
    pub duration_hours: usize,
    /// Snapshots of exactly the hours inside the window.
    pub conditions: Vec<WindowHour>,
}
