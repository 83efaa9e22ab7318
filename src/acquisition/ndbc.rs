//! NDBC station acquisition
//!
//! NDBC publishes realtime standard meteorological data as whitespace-separated
//! text (format: <https://www.ndbc.noaa.gov/faq/measdes.shtml>). Two header
//! lines (field names, units), then data rows newest first:
//!
//! ```text
//! #YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
//! #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
//! 2026 08 22 13 50 140  6.0  7.0   1.2     6   4.5 152 1014.2  29.1  30.2  24.8   MM   MM    MM
//! ```
//!
//! Missing readings are sentinel-coded (`MM`, `99.0`, `999`, ...). Values stay
//! in station-native units; unit conversion happens at display time.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use super::AcquisitionError;
use crate::types::{BuoyObservation, BuoyReport};

pub const NDBC_URL: &str = "https://www.ndbc.noaa.gov/data/realtime2";

const SOURCE: &str = "ndbc";

/// Cap on data rows taken from the feed (realtime2 files carry ~45 days).
const MAX_ROWS: usize = 48;

/// NDBC realtime2 client.
pub struct NdbcSource {
    http: reqwest::Client,
    base_url: String,
}

impl NdbcSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, NDBC_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_station(&self, station_id: &str) -> Result<BuoyReport, AcquisitionError> {
        let url = format!("{}/{}.txt", self.base_url, station_id);
        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(AcquisitionError::UpstreamStatus {
                source: SOURCE,
                status: resp.status(),
            });
        }

        let text = resp.text().await?;
        let report = parse_realtime2(station_id, &text)?;
        debug!(
            station = station_id,
            observations = report.observations.len(),
            "Buoy feed parsed"
        );
        Ok(report)
    }
}

/// Parse a realtime2 standard meteorological file.
///
/// Rows that are too short or carry an unparseable timestamp are skipped;
/// a file with no usable rows at all is malformed.
pub fn parse_realtime2(station_id: &str, text: &str) -> Result<BuoyReport, AcquisitionError> {
    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.len() < 3 {
        return Err(AcquisitionError::Malformed {
            source: SOURCE,
            message: format!("no data rows for station {station_id}"),
        });
    }

    // lines[0] is the field-name header, lines[1] the units row.
    let observations: Vec<BuoyObservation> = lines[2..]
        .iter()
        .take(MAX_ROWS)
        .filter_map(|line| parse_row(line))
        .collect();

    if observations.is_empty() {
        return Err(AcquisitionError::Malformed {
            source: SOURCE,
            message: format!("no parseable rows for station {station_id}"),
        });
    }

    let latest = observations.first().cloned();
    Ok(BuoyReport {
        station_id: station_id.to_string(),
        fetched_at: Utc::now(),
        source: SOURCE.to_string(),
        observations,
        latest,
    })
}

fn parse_row(line: &str) -> Option<BuoyObservation> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 10 {
        return None;
    }

    let time = row_time(&cols)?;
    Some(BuoyObservation {
        time,
        wind_direction: reading(&cols, 5),
        wind_speed: reading(&cols, 6),
        wind_gusts: reading(&cols, 7),
        wave_height: reading(&cols, 8),
        dominant_period: reading(&cols, 9),
        average_period: reading(&cols, 10),
        mean_wave_direction: reading(&cols, 11),
        pressure: reading(&cols, 12),
        air_temp: reading(&cols, 13),
        water_temp: reading(&cols, 14),
        dewpoint: reading(&cols, 15),
        visibility: reading(&cols, 16),
    })
}

/// Columns 0..=4 are YY MM DD hh mm; realtime2 years are four-digit.
fn row_time(cols: &[&str]) -> Option<DateTime<Utc>> {
    let year: i32 = cols[0].parse().ok()?;
    let month: u32 = cols[1].parse().ok()?;
    let day: u32 = cols[2].parse().ok()?;
    let hour: u32 = cols[3].parse().ok()?;
    let minute: u32 = cols[4].parse().ok()?;
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
}

fn reading(cols: &[&str], index: usize) -> Option<f64> {
    cols.get(index).copied().and_then(parse_value)
}

/// Missing readings come through as `MM` or as magnitude-appropriate
/// nines sentinels.
fn parse_value(raw: &str) -> Option<f64> {
    match raw {
        "" | "MM" | "99.0" | "99.00" | "999" | "999.0" | "9999.0" => None,
        _ => raw.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
2026 08 22 13 50 140  6.0  7.0   1.2     6   4.5 152 1014.2  29.1  30.2  24.8   MM   MM    MM
2026 08 22 12 50 145  5.5  6.5   1.1     6   4.4 150 1014.8  28.9  30.2  24.6   MM +0.2    MM
2026 08 22 11 50  MM 99.0 99.0 99.00    MM    MM 999 9999.0  99.0 999.0 999.0   MM   MM    MM";

    #[test]
    fn parses_rows_newest_first() {
        let report = parse_realtime2("42001", SAMPLE).unwrap();
        assert_eq!(report.station_id, "42001");
        assert_eq!(report.observations.len(), 3);

        let latest = report.latest.unwrap();
        assert_eq!(latest.time.to_rfc3339(), "2026-08-22T13:50:00+00:00");
        assert_eq!(latest.wind_direction, Some(140.0));
        assert_eq!(latest.wind_speed, Some(6.0));
        assert_eq!(latest.wave_height, Some(1.2));
        assert_eq!(latest.pressure, Some(1014.2));
        assert_eq!(latest.visibility, None);
    }

    #[test]
    fn sentinel_values_become_none() {
        let report = parse_realtime2("42001", SAMPLE).unwrap();
        let gap_row = &report.observations[2];
        assert_eq!(gap_row.wind_direction, None);
        assert_eq!(gap_row.wind_speed, None);
        assert_eq!(gap_row.wave_height, None);
        assert_eq!(gap_row.mean_wave_direction, None);
        assert_eq!(gap_row.pressure, None);
        assert_eq!(gap_row.water_temp, None);
        // Time columns still parse even when every reading is missing
        assert_eq!(gap_row.time.to_rfc3339(), "2026-08-22T11:50:00+00:00");
    }

    #[test]
    fn short_rows_are_skipped() {
        let text = "\
#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
2026 08 22 13 50 140  6.0  7.0   1.2     6   4.5 152 1014.2  29.1
2026 08 22 12 50 145";
        let report = parse_realtime2("42019", text).unwrap();
        // First row has 14 columns (>= 10) and survives with trailing fields None;
        // the 5-column row is dropped.
        assert_eq!(report.observations.len(), 1);
        assert_eq!(report.observations[0].air_temp, Some(29.1));
        assert_eq!(report.observations[0].water_temp, None);
    }

    #[test]
    fn header_only_file_is_malformed() {
        let text = "#YY  MM DD hh mm WDIR\n#yr  mo dy hr mn degT";
        let err = parse_realtime2("42002", text).unwrap_err();
        assert!(matches!(err, AcquisitionError::Malformed { .. }));
    }

    #[test]
    fn row_cap_limits_long_files() {
        let mut text = String::from(
            "#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE\n\
             #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft\n",
        );
        for hour in 0..24 {
            for minute in [50, 20, 10] {
                text.push_str(&format!(
                    "2026 08 21 {hour:02} {minute} 140 6.0 7.0 1.2 6 4.5 152 1014.2 29.1 30.2 24.8 MM MM MM\n"
                ));
            }
        }
        let report = parse_realtime2("42003", &text).unwrap();
        assert_eq!(report.observations.len(), 48);
    }

    #[test]
    fn unparseable_timestamp_drops_the_row() {
        let text = "\
#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
2026 13 99 13 50 140  6.0  7.0   1.2     6   4.5 152 1014.2  29.1  30.2  24.8   MM   MM    MM
2026 08 22 12 50 145  5.5  6.5   1.1     6   4.4 150 1014.8  28.9  30.2  24.6   MM   MM    MM";
        let report = parse_realtime2("42020", text).unwrap();
        assert_eq!(report.observations.len(), 1);
        assert_eq!(report.observations[0].wind_direction, Some(145.0));
    }
}
