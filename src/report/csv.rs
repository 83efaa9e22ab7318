//! CSV export
//!
//! Plain RFC-4180-style rows: fields containing a comma, quote, or newline
//! are quoted with internal quotes doubled; missing readings export as
//! empty fields, never as sentinel text.

use chrono::Utc;

use crate::types::{BuoyReport, ForecastBundle, OperationType, WeatherWindow};

/// Hourly forecast series as CSV, one row per hour.
pub fn weather_csv(bundle: &ForecastBundle) -> String {
    const HEADERS: [&str; 10] = [
        "Time (UTC)",
        "Wave Height (m)",
        "Swell Height (m)",
        "Wave Period (s)",
        "Wind Speed (km/h)",
        "Wind Gusts (km/h)",
        "Wind Direction (°)",
        "Temperature (°C)",
        "Pressure (hPa)",
        "Visibility (m)",
    ];

    let rows = bundle.hourly.iter().map(|h| {
        vec![
            h.time.format("%Y-%m-%d %H:%M").to_string(),
            opt2(h.wave_height),
            opt2(h.swell_height),
            opt1(h.wave_period),
            opt1(h.wind_speed),
            opt1(h.wind_gusts),
            raw(h.wind_direction),
            opt1(h.temperature),
            opt1(h.pressure),
            raw(h.visibility),
        ]
    });

    to_csv(&HEADERS, rows)
}

/// Weather windows for one operation as CSV, numbered from 1 in scan order.
pub fn windows_csv(windows: &[WeatherWindow], op: OperationType, region_name: &str) -> String {
    const HEADERS: [&str; 6] = [
        "Window #",
        "Start Time",
        "End Time",
        "Duration (hours)",
        "Operation Type",
        "Region",
    ];

    let rows = windows.iter().enumerate().map(|(i, w)| {
        vec![
            (i + 1).to_string(),
            w.start_time.format("%Y-%m-%d %H:%M").to_string(),
            w.end_time.format("%Y-%m-%d %H:%M").to_string(),
            w.duration_hours.to_string(),
            op.key().to_string(),
            region_name.to_string(),
        ]
    });

    to_csv(&HEADERS, rows)
}

/// Buoy observations as CSV, newest first (feed order).
pub fn buoy_csv(report: &BuoyReport) -> String {
    const HEADERS: [&str; 9] = [
        "Time (UTC)",
        "Wave Height (m)",
        "Dom Period (s)",
        "Wind Speed (m/s)",
        "Wind Gusts (m/s)",
        "Wind Dir (°)",
        "Air Temp (°C)",
        "Water Temp (°C)",
        "Pressure (hPa)",
    ];

    let rows = report.observations.iter().map(|o| {
        vec![
            o.time.format("%Y-%m-%d %H:%M").to_string(),
            opt2(o.wave_height),
            opt0(o.dominant_period),
            opt1(o.wind_speed),
            opt1(o.wind_gusts),
            raw(o.wind_direction),
            opt1(o.air_temp),
            opt1(o.water_temp),
            opt1(o.pressure),
        ]
    });

    to_csv(&HEADERS, rows)
}

// ============================================================================
// Download filenames
// ============================================================================

pub fn weather_filename(region_id: &str) -> String {
    format!("weather-forecast-{region_id}-{}.csv", today())
}

pub fn windows_filename(op: OperationType) -> String {
    format!("weather-windows-{}-{}.csv", op.key(), today())
}

pub fn buoy_filename(station_id: &str) -> String {
    format!("buoy-{station_id}-{}.csv", today())
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

// ============================================================================
// Row assembly
// ============================================================================

fn to_csv<I>(headers: &[&str], rows: I) -> String
where
    I: Iterator<Item = Vec<String>>,
{
    let mut lines = vec![headers
        .iter()
        .map(|h| escape(h))
        .collect::<Vec<_>>()
        .join(",")];
    for row in rows {
        lines.push(
            row.iter()
                .map(|field| escape(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn opt0(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.0}")).unwrap_or_default()
}

fn opt1(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

fn opt2(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn raw(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DailyAggregates, HourlyObservation, Location, WindowHour};
    use chrono::{Duration, TimeZone, Utc};

    fn bundle_with_two_hours() -> ForecastBundle {
        let start = Utc.with_ymd_and_hms(2026, 8, 22, 0, 0, 0).unwrap();
        let mut first = HourlyObservation::empty(start);
        first.wave_height = Some(1.234);
        first.wind_speed = Some(18.7);
        first.wind_direction = Some(140.0);
        let second = HourlyObservation::empty(start + Duration::hours(1));

        ForecastBundle {
            location: Location {
                latitude: 27.5,
                longitude: -90.5,
            },
            fetched_at: start,
            source: "open-meteo".to_string(),
            hourly: vec![first, second],
            daily: DailyAggregates::default(),
        }
    }

    #[test]
    fn fields_with_commas_are_quoted_and_inner_quotes_doubled() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn weather_csv_rounds_and_blanks_missing() {
        let csv = weather_csv(&bundle_with_two_hours());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Time (UTC),Wave Height (m)"));
        assert_eq!(
            lines[1],
            "2026-08-22 00:00,1.23,,,18.7,,140,,,"
        );
        // All-empty hour keeps its timestamp, every reading blank
        assert_eq!(lines[2], "2026-08-22 01:00,,,,,,,,,");
    }

    #[test]
    fn windows_csv_numbers_from_one() {
        let start = Utc.with_ymd_and_hms(2026, 8, 22, 6, 0, 0).unwrap();
        let window = WeatherWindow {
            start_time: start,
            end_time: start + Duration::hours(3),
            start_index: 6,
            duration_hours: 4,
            conditions: vec![WindowHour {
                time: start,
                wave_height: Some(1.0),
                wind_speed: None,
                wind_gusts: None,
                visibility: None,
            }],
        };
        let csv = windows_csv(
            &[window.clone(), window],
            OperationType::CraneLift,
            "Gulf of Mexico",
        );
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,2026-08-22 06:00,2026-08-22 09:00,4,craneLift,"));
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn region_names_with_commas_survive_round_trip() {
        let start = Utc.with_ymd_and_hms(2026, 8, 22, 6, 0, 0).unwrap();
        let window = WeatherWindow {
            start_time: start,
            end_time: start,
            start_index: 0,
            duration_hours: 1,
            conditions: vec![],
        };
        let csv = windows_csv(&[window], OperationType::RigMove, "Houston, TX Sector");
        assert!(csv.contains("\"Houston, TX Sector\""));
    }

    #[test]
    fn filenames_carry_key_and_date() {
        let name = windows_filename(OperationType::PersonnelTransferW2W);
        assert!(name.starts_with("weather-windows-personnelTransferW2W-"));
        assert!(name.ends_with(".csv"));
    }
}
