//! NHC active tropical cyclone acquisition
//!
//! The National Hurricane Center publishes active systems through an ArcGIS
//! map service; layer 7 carries current storm positions with advisory
//! properties (BASIN, STORMNUM, STORMTYPE, MAXWIND, ...). Queried as GeoJSON
//! with `where=1=1` to get every active feature.
//!
//! ArcGIS property typing is loose — STORMNUM and ADVISNUM arrive as either
//! strings or numbers depending on the layer build, so those two fields are
//! normalized through `serde_json::Value`.

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::AcquisitionError;
use crate::types::{Storm, StormIntensity, StormMovement, StormPosition, StormReport};

pub const NHC_URL: &str =
    "https://mapservices.weather.noaa.gov/tropical/rest/services/tropical/NHC_tropical_weather/MapServer";

/// Layer index for current storm positions within the map service.
const ACTIVE_STORMS_LAYER: u32 = 7;

const SOURCE: &str = "nhc";

/// NHC ArcGIS client.
pub struct NhcSource {
    http: reqwest::Client,
    base_url: String,
}

impl NhcSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, NHC_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch every active tropical system. An empty feature list is a valid
    /// answer (no active storms), not an error.
    pub async fn fetch_active_storms(&self) -> Result<StormReport, AcquisitionError> {
        let url = format!("{}/{}/query", self.base_url, ACTIVE_STORMS_LAYER);
        let resp = self
            .http
            .get(&url)
            .query(&[("where", "1=1"), ("outFields", "*"), ("f", "geojson")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AcquisitionError::UpstreamStatus {
                source: SOURCE,
                status: resp.status(),
            });
        }

        let raw: FeatureCollection = resp.json().await?;
        let report = normalize(raw);
        debug!(storms = report.storms.len(), "Active storms fetched");
        Ok(report)
    }
}

// ============================================================================
// Raw response shapes
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Default, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: StormProperties,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct StormProperties {
    #[serde(rename = "BASIN")]
    basin: Option<String>,
    #[serde(rename = "STORMNUM")]
    storm_num: Option<serde_json::Value>,
    #[serde(rename = "STORMNAME")]
    storm_name: Option<String>,
    #[serde(rename = "STORMTYPE")]
    storm_type: Option<String>,
    #[serde(rename = "MAXWIND")]
    max_wind: Option<f64>,
    #[serde(rename = "MINPRES")]
    min_pressure: Option<f64>,
    #[serde(rename = "ADVISNUM")]
    advisory_num: Option<serde_json::Value>,
    #[serde(rename = "MOVEMENTDIR")]
    movement_dir: Option<f64>,
    #[serde(rename = "MOVEMENTSPD")]
    movement_speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

// ============================================================================
// Normalization
// ============================================================================

fn normalize(raw: FeatureCollection) -> StormReport {
    let storms = raw
        .features
        .into_iter()
        .map(|f| {
            let p = f.properties;
            let basin_code = p.basin.as_deref().unwrap_or("UNK");
            let number = p
                .storm_num
                .as_ref()
                .and_then(loose_string)
                .unwrap_or_else(|| "00".to_string());
            let storm_type = p.storm_type.unwrap_or_else(|| "Unknown".to_string());

            Storm {
                id: format!("{basin_code}{number}"),
                name: p.storm_name.unwrap_or_else(|| "Unknown".to_string()),
                basin: basin_name(basin_code).to_string(),
                category: saffir_simpson(&storm_type, p.max_wind),
                storm_type,
                advisory_number: p.advisory_num.as_ref().and_then(loose_string),
                movement: StormMovement {
                    direction: p.movement_dir,
                    speed: p.movement_speed,
                },
                intensity: StormIntensity {
                    wind_speed: p.max_wind,
                    pressure: p.min_pressure,
                },
                position: f.geometry.as_ref().and_then(point_position),
            }
        })
        .collect();

    StormReport {
        storms,
        fetched_at: Utc::now(),
        source: SOURCE.to_string(),
    }
}

/// Basin code → dashboard slug. Unknown codes pass through unchanged.
fn basin_name(code: &str) -> &str {
    match code {
        "AL" => "atlantic",
        "EP" => "epac",
        "CP" => "cpac",
        "WP" => "wpac",
        "IO" => "nio",
        "SH" => "aus",
        other => other,
    }
}

/// Saffir-Simpson category from advisory type and max sustained wind (kt).
///
/// Depressions and tropical storms are category 0 by definition. For
/// hurricane-typed systems the category comes from wind speed; without a
/// wind value the category is unknown.
pub fn saffir_simpson(storm_type: &str, max_wind_kt: Option<f64>) -> Option<u8> {
    if storm_type == "TD" || storm_type == "TS" {
        return Some(0);
    }
    let wind = max_wind_kt?;
    Some(if wind >= 137.0 {
        5
    } else if wind >= 113.0 {
        4
    } else if wind >= 96.0 {
        3
    } else if wind >= 83.0 {
        2
    } else if wind >= 64.0 {
        1
    } else {
        0
    })
}

/// Display label for an advisory type + category pairing, as shown in
/// storm tables.
pub fn category_label(storm_type: &str, category: Option<u8>) -> String {
    match (storm_type, category) {
        ("TD", _) => "Tropical Depression".to_string(),
        ("TS", _) => "Tropical Storm".to_string(),
        (_, Some(c)) if c >= 1 => format!("Category {c} Hurricane"),
        _ => "Tropical System".to_string(),
    }
}

/// ArcGIS string-or-number property → string.
fn loose_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn point_position(geometry: &Geometry) -> Option<StormPosition> {
    if geometry.kind != "Point" {
        return None;
    }
    let coords = geometry.coordinates.as_array()?;
    // GeoJSON order: [longitude, latitude]
    let longitude = coords.first()?.as_f64()?;
    let latitude = coords.get(1)?.as_f64()?;
    Some(StormPosition {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depressions_and_tropical_storms_are_category_zero() {
        assert_eq!(saffir_simpson("TD", Some(30.0)), Some(0));
        assert_eq!(saffir_simpson("TS", Some(50.0)), Some(0));
        // Even without wind data the type alone settles it
        assert_eq!(saffir_simpson("TD", None), Some(0));
    }

    #[test]
    fn hurricane_without_wind_data_has_unknown_category() {
        assert_eq!(saffir_simpson("HU", None), None);
    }

    #[test]
    fn saffir_simpson_band_edges() {
        assert_eq!(saffir_simpson("HU", Some(63.9)), Some(0));
        assert_eq!(saffir_simpson("HU", Some(64.0)), Some(1));
        assert_eq!(saffir_simpson("HU", Some(83.0)), Some(2));
        assert_eq!(saffir_simpson("HU", Some(96.0)), Some(3));
        assert_eq!(saffir_simpson("HU", Some(113.0)), Some(4));
        assert_eq!(saffir_simpson("HU", Some(137.0)), Some(5));
        assert_eq!(saffir_simpson("HU", Some(160.0)), Some(5));
    }

    #[test]
    fn normalize_maps_advisory_properties() {
        let raw: FeatureCollection = serde_json::from_str(
            r#"{
                "features": [{
                    "properties": {
                        "BASIN": "AL",
                        "STORMNUM": 9,
                        "STORMNAME": "IDALIA",
                        "STORMTYPE": "HU",
                        "MAXWIND": 100.0,
                        "MINPRES": 949.0,
                        "ADVISNUM": "12A",
                        "MOVEMENTDIR": 0.0,
                        "MOVEMENTSPD": 12.0
                    },
                    "geometry": {"type": "Point", "coordinates": [-85.2, 28.9]}
                }]
            }"#,
        )
        .unwrap();

        let report = normalize(raw);
        assert_eq!(report.storms.len(), 1);
        let storm = &report.storms[0];
        assert_eq!(storm.id, "AL9");
        assert_eq!(storm.name, "IDALIA");
        assert_eq!(storm.basin, "atlantic");
        assert_eq!(storm.category, Some(3));
        assert_eq!(storm.advisory_number.as_deref(), Some("12A"));
        // A due-north heading of 0° is real data, not missing data
        assert_eq!(storm.movement.direction, Some(0.0));
        let position = storm.position.unwrap();
        assert!((position.latitude - 28.9).abs() < 1e-9);
        assert!((position.longitude - (-85.2)).abs() < 1e-9);
    }

    #[test]
    fn missing_properties_fall_back_to_placeholders() {
        let raw: FeatureCollection =
            serde_json::from_str(r#"{"features": [{"properties": {}}]}"#).unwrap();
        let report = normalize(raw);
        let storm = &report.storms[0];
        assert_eq!(storm.id, "UNK00");
        assert_eq!(storm.name, "Unknown");
        assert_eq!(storm.storm_type, "Unknown");
        assert_eq!(storm.category, None);
        assert!(storm.position.is_none());
    }

    #[test]
    fn empty_feature_list_is_a_calm_ocean() {
        let report = normalize(FeatureCollection::default());
        assert!(report.storms.is_empty());
        assert_eq!(report.source, "nhc");
    }

    #[test]
    fn unknown_basin_code_passes_through() {
        assert_eq!(basin_name("AL"), "atlantic");
        assert_eq!(basin_name("SH"), "aus");
        assert_eq!(basin_name("XX"), "XX");
    }

    #[test]
    fn category_labels_follow_the_advisory_type() {
        assert_eq!(category_label("TD", Some(0)), "Tropical Depression");
        assert_eq!(category_label("TS", Some(0)), "Tropical Storm");
        assert_eq!(category_label("HU", Some(3)), "Category 3 Hurricane");
        // Hurricane-typed but below Cat 1 winds, or intensity unknown
        assert_eq!(category_label("HU", Some(0)), "Tropical System");
        assert_eq!(category_label("HU", None), "Tropical System");
    }
}
