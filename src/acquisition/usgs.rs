//! USGS earthquake acquisition
//!
//! The FDSN event service answers filtered GeoJSON queries. The dashboard
//! asks for magnitude 4.0+ events from the last week, optionally constrained
//! to a radius around the site, newest first. Event times arrive as epoch
//! milliseconds.
//!
//! Features missing a time or position are dropped at the boundary — every
//! `Earthquake` the crate hands out is plottable.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use super::AcquisitionError;
use crate::types::{Earthquake, Location, SeismicReport};

pub const USGS_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

const SOURCE: &str = "usgs";

/// Query bounds for the event feed.
#[derive(Debug, Clone)]
pub struct SeismicQuery {
    pub min_magnitude: f64,
    /// Look-back window in days.
    pub days: i64,
    /// Constrain results to a radius around this point when set.
    pub center: Option<Location>,
    pub radius_km: f64,
    pub limit: u32,
}

impl Default for SeismicQuery {
    fn default() -> Self {
        Self {
            min_magnitude: 4.0,
            days: 7,
            center: None,
            radius_km: 500.0,
            limit: 100,
        }
    }
}

impl SeismicQuery {
    /// Scope the default query to a site.
    pub fn around(center: Location) -> Self {
        Self {
            center: Some(center),
            ..Self::default()
        }
    }
}

/// USGS FDSN client.
pub struct UsgsSource {
    http: reqwest::Client,
    base_url: String,
}

impl UsgsSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, USGS_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    pub async fn fetch_recent(&self, query: &SeismicQuery) -> Result<SeismicReport, AcquisitionError> {
        let params = query_params(query, Utc::now());
        let resp = self.http.get(&self.base_url).query(&params).send().await?;

        if !resp.status().is_success() {
            return Err(AcquisitionError::UpstreamStatus {
                source: SOURCE,
                status: resp.status(),
            });
        }

        let raw: UsgsResponse = resp.json().await?;
        let report = normalize(raw);
        debug!(count = report.count, "Seismic events fetched");
        Ok(report)
    }
}

/// FDSN wants `starttime` as a bare date; the radius triple is only sent
/// when the query has a center.
fn query_params(query: &SeismicQuery, now: DateTime<Utc>) -> Vec<(String, String)> {
    let start = (now - chrono::Duration::days(query.days)).date_naive();
    let mut params = vec![
        ("format".to_string(), "geojson".to_string()),
        ("starttime".to_string(), start.to_string()),
        ("minmagnitude".to_string(), query.min_magnitude.to_string()),
        ("orderby".to_string(), "time".to_string()),
        ("limit".to_string(), query.limit.to_string()),
    ];
    if let Some(center) = query.center {
        params.push(("latitude".to_string(), center.latitude.to_string()));
        params.push(("longitude".to_string(), center.longitude.to_string()));
        params.push(("maxradiuskm".to_string(), query.radius_km.to_string()));
    }
    params
}

/// Qualitative magnitude class, as used in report tables.
pub fn magnitude_label(magnitude: f64) -> &'static str {
    if magnitude < 4.0 {
        "Minor"
    } else if magnitude < 5.0 {
        "Light"
    } else if magnitude < 6.0 {
        "Moderate"
    } else if magnitude < 7.0 {
        "Strong"
    } else if magnitude < 8.0 {
        "Major"
    } else {
        "Great"
    }
}

// ============================================================================
// Raw response shapes
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct UsgsResponse {
    #[serde(default)]
    metadata: UsgsMetadata,
    #[serde(default)]
    features: Vec<UsgsFeature>,
}

#[derive(Debug, Default, Deserialize)]
struct UsgsMetadata {
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct UsgsFeature {
    id: String,
    #[serde(default)]
    properties: UsgsProperties,
    #[serde(default)]
    geometry: Option<UsgsGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct UsgsProperties {
    mag: Option<f64>,
    place: Option<String>,
    /// Epoch milliseconds.
    time: Option<i64>,
    updated: Option<i64>,
    tsunami: Option<i64>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    status: Option<String>,
    alert: Option<String>,
    sig: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UsgsGeometry {
    /// GeoJSON order: [longitude, latitude, depth_km]
    #[serde(default)]
    coordinates: Vec<Option<f64>>,
}

// ============================================================================
// Normalization
// ============================================================================

fn normalize(raw: UsgsResponse) -> SeismicReport {
    let earthquakes: Vec<Earthquake> = raw
        .features
        .into_iter()
        .filter_map(|f| {
            let geometry = f.geometry?;
            let longitude = geometry.coordinates.first().copied().flatten();
            let latitude = geometry.coordinates.get(1).copied().flatten();
            let depth_km = geometry.coordinates.get(2).copied().flatten();

            let time = f.properties.time.and_then(epoch_ms);
            let (Some(latitude), Some(longitude), Some(time)) = (latitude, longitude, time) else {
                warn!(id = %f.id, "Dropping seismic event without time/position");
                return None;
            };

            Some(Earthquake {
                id: f.id,
                magnitude: f.properties.mag,
                place: f.properties.place,
                time,
                updated: f.properties.updated.and_then(epoch_ms),
                latitude,
                longitude,
                depth_km,
                tsunami: f.properties.tsunami == Some(1),
                event_type: f.properties.event_type,
                status: f.properties.status,
                alert: f.properties.alert,
                significance: f.properties.sig,
            })
        })
        .collect();

    SeismicReport {
        count: raw.metadata.count.unwrap_or(earthquakes.len()),
        earthquakes,
        fetched_at: Utc::now(),
        source: SOURCE.to_string(),
    }
}

fn epoch_ms(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UsgsResponse {
        serde_json::from_str(
            r#"{
                "metadata": {"count": 2},
                "features": [
                    {
                        "id": "us7000abcd",
                        "properties": {
                            "mag": 5.2,
                            "place": "120 km S of Perryville, Alaska",
                            "time": 1755820800000,
                            "updated": 1755824400000,
                            "tsunami": 1,
                            "type": "earthquake",
                            "status": "reviewed",
                            "alert": "green",
                            "sig": 416
                        },
                        "geometry": {"coordinates": [-159.6, 54.8, 32.5]}
                    },
                    {
                        "id": "us7000wxyz",
                        "properties": {"mag": 4.1, "time": 1755810000000, "tsunami": 0},
                        "geometry": {"coordinates": [142.3, 38.1, 10.0]}
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn normalize_maps_fields_and_coordinate_order() {
        let report = normalize(sample());
        assert_eq!(report.count, 2);
        let quake = &report.earthquakes[0];
        assert_eq!(quake.id, "us7000abcd");
        assert_eq!(quake.magnitude, Some(5.2));
        assert!((quake.latitude - 54.8).abs() < 1e-9);
        assert!((quake.longitude - (-159.6)).abs() < 1e-9);
        assert_eq!(quake.depth_km, Some(32.5));
        assert_eq!(quake.significance, Some(416));
    }

    #[test]
    fn event_times_convert_from_epoch_milliseconds() {
        let report = normalize(sample());
        assert_eq!(
            report.earthquakes[0].time.to_rfc3339(),
            "2025-08-22T00:00:00+00:00"
        );
    }

    #[test]
    fn tsunami_flag_requires_exactly_one() {
        let report = normalize(sample());
        assert!(report.earthquakes[0].tsunami);
        assert!(!report.earthquakes[1].tsunami);
    }

    #[test]
    fn events_without_position_or_time_are_dropped() {
        let raw: UsgsResponse = serde_json::from_str(
            r#"{
                "features": [
                    {"id": "nogeom", "properties": {"mag": 5.0, "time": 1755810000000}},
                    {"id": "notime", "properties": {"mag": 5.0},
                     "geometry": {"coordinates": [10.0, 20.0, 5.0]}}
                ]
            }"#,
        )
        .unwrap();
        let report = normalize(raw);
        assert!(report.earthquakes.is_empty());
        // No metadata count — falls back to surviving events
        assert_eq!(report.count, 0);
    }

    #[test]
    fn query_sends_date_only_starttime() {
        let now = Utc.with_ymd_and_hms(2026, 8, 22, 14, 30, 0).unwrap();
        let params = query_params(&SeismicQuery::default(), now);
        let start = params.iter().find(|(k, _)| k == "starttime").unwrap();
        assert_eq!(start.1, "2026-08-15");
        assert!(!params.iter().any(|(k, _)| k == "latitude"));
    }

    #[test]
    fn query_with_center_adds_radius_triple() {
        let query = SeismicQuery::around(Location {
            latitude: 27.5,
            longitude: -90.5,
        });
        let params = query_params(&query, Utc::now());
        assert!(params.iter().any(|(k, v)| k == "latitude" && v == "27.5"));
        assert!(params.iter().any(|(k, v)| k == "maxradiuskm" && v == "500"));
    }

    #[test]
    fn magnitude_labels_follow_class_boundaries() {
        assert_eq!(magnitude_label(3.9), "Minor");
        assert_eq!(magnitude_label(4.0), "Light");
        assert_eq!(magnitude_label(5.0), "Moderate");
        assert_eq!(magnitude_label(6.0), "Strong");
        assert_eq!(magnitude_label(7.0), "Major");
        assert_eq!(magnitude_label(8.0), "Great");
    }
}
