//! Unit conversions and display formatting
//!
//! The forecast pipeline carries Open-Meteo native units (wind km/h, wave
//! meters, visibility meters); limit sets use marine-operations units
//! (knots, meters, kilometers). Conversions happen at comparison or display
//! time, never by rewriting stored observations.

use serde::{Deserialize, Serialize};

/// km/h → knots (1 knot = 1.852 km/h).
pub const KMH_TO_KNOTS: f64 = 0.539957;
/// m/s → knots.
pub const MS_TO_KNOTS: f64 = 1.94384;
/// knots → mph.
pub const KNOTS_TO_MPH: f64 = 1.15078;
/// m/s → km/h.
pub const MS_TO_KMH: f64 = 3.6;
/// km → nautical miles divisor.
pub const KM_PER_NM: f64 = 1.852;
/// km → statute miles divisor.
pub const KM_PER_MILE: f64 = 1.60934;
/// meters → feet.
pub const M_TO_FT: f64 = 3.28084;
/// hPa/mb → inHg.
pub const MB_TO_INHG: f64 = 0.02953;

pub fn kmh_to_knots(kmh: f64) -> f64 {
    kmh * KMH_TO_KNOTS
}

pub fn ms_to_knots(ms: f64) -> f64 {
    ms * MS_TO_KNOTS
}

pub fn knots_to_ms(kt: f64) -> f64 {
    kt / MS_TO_KNOTS
}

pub fn knots_to_mph(kt: f64) -> f64 {
    kt * KNOTS_TO_MPH
}

pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * MS_TO_KMH
}

pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / MS_TO_KMH
}

pub fn meters_to_km(m: f64) -> f64 {
    m / 1000.0
}

pub fn km_to_nm(km: f64) -> f64 {
    km / KM_PER_NM
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

pub fn meters_to_feet(m: f64) -> f64 {
    m * M_TO_FT
}

pub fn feet_to_meters(ft: f64) -> f64 {
    ft / M_TO_FT
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn mb_to_inhg(mb: f64) -> f64 {
    mb * MB_TO_INHG
}

// ============================================================================
// Display preferences
// ============================================================================

/// User-selectable wind speed display unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Knots,
    Mph,
    Ms,
    Kmh,
}

/// User-selectable wave height display unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaveUnit {
    #[default]
    Meters,
    Feet,
}

/// User-selectable temperature display unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// User-selectable distance display unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    Miles,
    Nm,
}

/// Per-quantity display units, persisted with settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitPreferences {
    pub wind_speed: WindUnit,
    pub wave_height: WaveUnit,
    pub temperature: TemperatureUnit,
    pub distance: DistanceUnit,
}

/// Partial unit-preference update: present fields overwrite, absent fields
/// keep their current value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitsPatch {
    pub wind_speed: Option<WindUnit>,
    pub wave_height: Option<WaveUnit>,
    pub temperature: Option<TemperatureUnit>,
    pub distance: Option<DistanceUnit>,
}

impl UnitPreferences {
    pub fn apply(&mut self, patch: UnitsPatch) {
        if let Some(wind) = patch.wind_speed {
            self.wind_speed = wind;
        }
        if let Some(waves) = patch.wave_height {
            self.wave_height = waves;
        }
        if let Some(temp) = patch.temperature {
            self.temperature = temp;
        }
        if let Some(distance) = patch.distance {
            self.distance = distance;
        }
    }
}

impl WindUnit {
    pub fn label(self) -> &'static str {
        match self {
            WindUnit::Knots => "kt",
            WindUnit::Mph => "mph",
            WindUnit::Ms => "m/s",
            WindUnit::Kmh => "km/h",
        }
    }

    /// Convert a km/h observation value into this display unit.
    pub fn from_kmh(self, kmh: f64) -> f64 {
        match self {
            WindUnit::Knots => kmh_to_knots(kmh),
            WindUnit::Mph => knots_to_mph(kmh_to_knots(kmh)),
            WindUnit::Ms => kmh_to_ms(kmh),
            WindUnit::Kmh => kmh,
        }
    }
}

impl WaveUnit {
    pub fn label(self) -> &'static str {
        match self {
            WaveUnit::Meters => "m",
            WaveUnit::Feet => "ft",
        }
    }

    pub fn from_meters(self, m: f64) -> f64 {
        match self {
            WaveUnit::Meters => m,
            WaveUnit::Feet => meters_to_feet(m),
        }
    }
}

impl TemperatureUnit {
    pub fn label(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn from_celsius(self, c: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => c,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(c),
        }
    }
}

impl DistanceUnit {
    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Miles => "mi",
            DistanceUnit::Nm => "NM",
        }
    }

    pub fn from_km(self, km: f64) -> f64 {
        match self {
            DistanceUnit::Km => km,
            DistanceUnit::Miles => km_to_miles(km),
            DistanceUnit::Nm => km_to_nm(km),
        }
    }
}

/// Format an optional reading with one decimal and a unit label; missing
/// data renders as `N/A`.
pub fn format_value(value: Option<f64>, label: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1} {label}"),
        _ => "N/A".to_string(),
    }
}
