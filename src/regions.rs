//! Operating regions, platforms, and NDBC stations
//!
//! Static catalog; in production these would come from BOEM/NPD feeds, but
//! a compiled-in list covers the supported planning regions.

use serde::Serialize;

use crate::types::Location;

/// One supported operating region with its representative forecast point.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl Region {
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A fixed production platform used as a map/context marker.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub operator: &'static str,
}

/// An NDBC buoy station available in a region.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuoyStation {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Default region when nothing is configured or stored.
pub const DEFAULT_REGION_ID: &str = "gom";

pub const REGIONS: &[Region] = &[
    Region { id: "gom", name: "Gulf of Mexico", short_name: "GoM", latitude: 27.5, longitude: -90.5 },
    Region { id: "northsea", name: "North Sea", short_name: "NS", latitude: 58.0, longitude: 2.0 },
    Region { id: "seasia", name: "Southeast Asia", short_name: "SEA", latitude: 6.0, longitude: 115.0 },
    Region { id: "brazil", name: "Brazil (Santos Basin)", short_name: "BRZ", latitude: -24.5, longitude: -42.5 },
    Region { id: "westafrica", name: "West Africa", short_name: "WAF", latitude: 4.4, longitude: 5.3 },
    Region { id: "australia", name: "Australia (NW Shelf)", short_name: "AUS", latitude: -19.5, longitude: 116.0 },
    Region { id: "middleeast", name: "Middle East (Gulf)", short_name: "ME", latitude: 26.5, longitude: 52.0 },
];

/// Look up a region by id.
pub fn region(id: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.id == id)
}

/// Region for `id`, falling back to the default when unknown.
pub fn region_or_default(id: &str) -> &'static Region {
    region(id).unwrap_or(&REGIONS[0])
}

/// Platforms for a region; unknown region → empty.
pub fn platforms_for(region_id: &str) -> &'static [Platform] {
    match region_id {
        "gom" => GOM_PLATFORMS,
        "northsea" => NORTH_SEA_PLATFORMS,
        "seasia" => SEASIA_PLATFORMS,
        "brazil" => BRAZIL_PLATFORMS,
        "westafrica" => WEST_AFRICA_PLATFORMS,
        "australia" => AUSTRALIA_PLATFORMS,
        "middleeast" => MIDDLE_EAST_PLATFORMS,
        _ => &[],
    }
}

/// NDBC stations for a region; regions without coverage return empty.
pub fn buoy_stations_for(region_id: &str) -> &'static [BuoyStation] {
    match region_id {
        "gom" => GOM_BUOYS,
        "northsea" => NORTH_SEA_BUOYS,
        _ => &[],
    }
}

const GOM_PLATFORMS: &[Platform] = &[
    Platform { id: "gom-001", name: "Thunder Horse", lat: 28.19, lon: -88.50, operator: "BP" },
    Platform { id: "gom-002", name: "Mad Dog", lat: 27.20, lon: -90.30, operator: "BP" },
    Platform { id: "gom-003", name: "Atlantis", lat: 27.20, lon: -90.03, operator: "BP" },
    Platform { id: "gom-004", name: "Mars", lat: 28.17, lon: -89.35, operator: "Shell" },
    Platform { id: "gom-005", name: "Ursa", lat: 28.15, lon: -89.10, operator: "Shell" },
    Platform { id: "gom-006", name: "Perdido", lat: 26.13, lon: -94.90, operator: "Shell" },
    Platform { id: "gom-007", name: "Na Kika", lat: 27.40, lon: -89.70, operator: "Shell" },
    Platform { id: "gom-008", name: "Appomattox", lat: 28.35, lon: -88.48, operator: "Shell" },
    Platform { id: "gom-009", name: "Jack/St Malo", lat: 26.68, lon: -91.07, operator: "Chevron" },
    Platform { id: "gom-010", name: "Tahiti", lat: 27.27, lon: -91.93, operator: "Chevron" },
];

const NORTH_SEA_PLATFORMS: &[Platform] = &[
    Platform { id: "ns-001", name: "Brent Charlie", lat: 61.05, lon: 1.72, operator: "Shell" },
    Platform { id: "ns-002", name: "Forties Alpha", lat: 57.72, lon: 0.95, operator: "Apache" },
    Platform { id: "ns-003", name: "Ekofisk", lat: 56.54, lon: 3.21, operator: "ConocoPhillips" },
    Platform { id: "ns-004", name: "Statfjord", lat: 61.25, lon: 1.82, operator: "Equinor" },
    Platform { id: "ns-005", name: "Troll A", lat: 60.64, lon: 3.73, operator: "Equinor" },
    Platform { id: "ns-006", name: "Gullfaks", lat: 61.17, lon: 2.18, operator: "Equinor" },
];

const SEASIA_PLATFORMS: &[Platform] = &[
    Platform { id: "sea-001", name: "Malikai", lat: 6.70, lon: 115.56, operator: "Shell" },
    Platform { id: "sea-002", name: "Gumusut-Kakap", lat: 5.37, lon: 116.15, operator: "Shell" },
    Platform { id: "sea-003", name: "Kikeh", lat: 6.33, lon: 114.28, operator: "MISC" },
];

const BRAZIL_PLATFORMS: &[Platform] = &[
    Platform { id: "brz-001", name: "P-76 Buzios", lat: -24.2, lon: -42.0, operator: "Petrobras" },
    Platform { id: "brz-002", name: "P-70 Atapu", lat: -24.5, lon: -42.3, operator: "Petrobras" },
    Platform { id: "brz-003", name: "Tupi (Lula)", lat: -25.3, lon: -43.0, operator: "Petrobras" },
];

const WEST_AFRICA_PLATFORMS: &[Platform] = &[
    Platform { id: "waf-001", name: "Bonga", lat: 4.56, lon: 4.64, operator: "Shell" },
    Platform { id: "waf-002", name: "Akpo", lat: 4.28, lon: 5.85, operator: "TotalEnergies" },
    Platform { id: "waf-003", name: "Egina", lat: 4.30, lon: 5.70, operator: "TotalEnergies" },
];

const AUSTRALIA_PLATFORMS: &[Platform] = &[
    Platform { id: "aus-001", name: "North West Shelf", lat: -19.59, lon: 116.14, operator: "Woodside" },
    Platform { id: "aus-002", name: "Gorgon", lat: -20.50, lon: 114.20, operator: "Chevron" },
    Platform { id: "aus-003", name: "Ichthys", lat: -13.88, lon: 124.80, operator: "INPEX" },
];

const MIDDLE_EAST_PLATFORMS: &[Platform] = &[
    Platform { id: "me-001", name: "Safaniya", lat: 28.80, lon: 49.00, operator: "Saudi Aramco" },
    Platform { id: "me-002", name: "Upper Zakum", lat: 24.85, lon: 53.58, operator: "ADNOC" },
    Platform { id: "me-003", name: "South Pars", lat: 26.50, lon: 52.50, operator: "NIOC" },
];

const GOM_BUOYS: &[BuoyStation] = &[
    BuoyStation { id: "42001", name: "Mid Gulf", lat: 25.888, lon: -89.658 },
    BuoyStation { id: "42002", name: "W Gulf", lat: 25.790, lon: -93.666 },
    BuoyStation { id: "42003", name: "E Gulf", lat: 25.925, lon: -85.612 },
    BuoyStation { id: "42019", name: "Freeport", lat: 27.913, lon: -95.352 },
    BuoyStation { id: "42020", name: "Corpus Christi", lat: 26.966, lon: -96.694 },
    BuoyStation { id: "42035", name: "Galveston", lat: 29.232, lon: -94.413 },
    BuoyStation { id: "42036", name: "W Tampa", lat: 28.500, lon: -84.517 },
    BuoyStation { id: "42039", name: "Pensacola", lat: 28.791, lon: -86.008 },
    BuoyStation { id: "42040", name: "Luke Island", lat: 29.185, lon: -88.226 },
];

const NORTH_SEA_BUOYS: &[BuoyStation] = &[
    BuoyStation { id: "62105", name: "K13 Platform", lat: 53.22, lon: 3.22 },
    BuoyStation { id: "62103", name: "Euro Platform", lat: 51.99, lon: 3.28 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_region_resolves_by_id() {
        for r in REGIONS {
            assert_eq!(region(r.id).map(|found| found.id), Some(r.id));
        }
        assert!(region("atlantis-prime").is_none());
    }

    #[test]
    fn unknown_region_falls_back_to_gulf_of_mexico() {
        let r = region_or_default("nowhere");
        assert_eq!(r.id, DEFAULT_REGION_ID);
        assert!((r.latitude - 27.5).abs() < f64::EPSILON);
    }

    #[test]
    fn regions_without_buoy_coverage_return_empty() {
        assert!(!buoy_stations_for("gom").is_empty());
        assert!(buoy_stations_for("brazil").is_empty());
        assert!(buoy_stations_for("unknown").is_empty());
    }
}
