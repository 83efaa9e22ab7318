//! Printable HTML forecast report
//!
//! Self-contained document (inline styles, no scripts) suitable for
//! print-to-PDF: current conditions, a per-24-hour outlook table, and the
//! operation windows the forecast supports. The footer carries an MD5
//! signature over the report's identifying content.

use chrono::Utc;

use crate::engine::{summarize_operations, windows_for_all_operations};
use crate::types::{ForecastBundle, GoStatus, HourlyObservation, Thresholds, WeatherWindow};

/// Render the full report document.
pub fn forecast_report(bundle: &ForecastBundle, region_name: &str, thresholds: &Thresholds) -> String {
    let region = escape_html(region_name);
    let source = escape_html(&bundle.source);
    let generated = Utc::now().format("%B %-d, %Y %H:%M").to_string();

    let current = current_conditions(bundle.current());
    let daily = daily_summary(&bundle.hourly);
    let windows = operation_windows(bundle, thresholds);

    let signature_content = format!(
        "{}:{}:{}:{}",
        region_name,
        bundle.fetched_at.timestamp(),
        bundle.hourly.len(),
        bundle.source
    );
    let signature = format!("MD5-{:x}", md5::compute(signature_content.as_bytes()));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Weather Report - {region}</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; color: #1a1a1a; padding: 40px; max-width: 800px; margin: 0 auto; }}
    h1 {{ font-size: 24px; margin-bottom: 4px; }}
    h2 {{ font-size: 16px; margin-top: 24px; margin-bottom: 8px; border-bottom: 2px solid #3b82f6; padding-bottom: 4px; }}
    .meta {{ color: #666; font-size: 12px; margin-bottom: 24px; }}
    .grid {{ display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; margin: 16px 0; }}
    .stat {{ background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 8px; padding: 12px; }}
    .stat-label {{ font-size: 11px; color: #64748b; }}
    .stat-value {{ font-size: 20px; font-weight: 600; margin-top: 4px; }}
    table {{ width: 100%; border-collapse: collapse; margin: 12px 0; font-size: 13px; }}
    th {{ text-align: left; padding: 8px; background: #f1f5f9; border-bottom: 2px solid #e2e8f0; font-weight: 600; }}
    td {{ padding: 6px 8px; border-bottom: 1px solid #f1f5f9; }}
    .go {{ color: #15803d; font-weight: 600; }}
    .no-go {{ color: #b91c1c; font-weight: 600; }}
    .unknown {{ color: #64748b; }}
    .footer {{ margin-top: 32px; padding-top: 16px; border-top: 1px solid #e2e8f0; color: #94a3b8; font-size: 11px; }}
    @media print {{ body {{ padding: 20px; }} }}
  </style>
</head>
<body>
  <h1>Weather Forecast Report</h1>
  <p class="meta">{region} | Generated: {generated} UTC | Source: {source}</p>

  <h2>Current Conditions</h2>
{current}
{daily}
{windows}
  <div class="footer">
    <p>OffshoreWatch - Offshore Operations Weather &amp; Safety Planning</p>
    <p>Forecast data is for planning purposes only. Hours with missing readings
    are treated as within limits; verify conditions before committing an operation.</p>
    <p>Report signature: {signature}</p>
  </div>
</body>
</html>"#
    )
}

// ============================================================================
// Sections
// ============================================================================

fn current_conditions(current: Option<&HourlyObservation>) -> String {
    let stats = match current {
        Some(obs) => [
            ("Wave Height", with_unit(obs.wave_height, 1, "m")),
            ("Wind Speed", with_unit(obs.wind_speed, 1, "km/h")),
            ("Temperature", with_unit(obs.temperature, 1, "°C")),
            ("Swell Height", with_unit(obs.swell_height, 1, "m")),
            ("Wind Gusts", with_unit(obs.wind_gusts, 1, "km/h")),
            ("Pressure", with_unit(obs.pressure, 0, "hPa")),
        ],
        None => [
            ("Wave Height", "N/A".to_string()),
            ("Wind Speed", "N/A".to_string()),
            ("Temperature", "N/A".to_string()),
            ("Swell Height", "N/A".to_string()),
            ("Wind Gusts", "N/A".to_string()),
            ("Pressure", "N/A".to_string()),
        ],
    };

    let cells: String = stats
        .iter()
        .map(|(label, value)| {
            format!(
                "    <div class=\"stat\"><div class=\"stat-label\">{label}</div><div class=\"stat-value\">{value}</div></div>\n"
            )
        })
        .collect();
    format!("  <div class=\"grid\">\n{cells}  </div>")
}

/// One row per 24-hour slice of the series (forecast days, not calendar
/// days — a series starting mid-day simply chunks from its first hour).
fn daily_summary(hourly: &[HourlyObservation]) -> String {
    if hourly.is_empty() {
        return String::new();
    }

    let rows: String = hourly
        .chunks(24)
        .map(|day| {
            let waves: Vec<f64> = day.iter().filter_map(|h| h.wave_height).collect();
            let winds: Vec<f64> = day.iter().filter_map(|h| h.wind_speed).collect();
            let temps: Vec<f64> = day.iter().filter_map(|h| h.temperature).collect();

            let date = day[0].time.format("%a, %b %-d").to_string();
            let min_wave = fold1(&waves, |a, b| a.min(b));
            let max_wave = fold1(&waves, |a, b| a.max(b));
            let max_wind = fold1(&winds, |a, b| a.max(b));
            let avg_temp = if temps.is_empty() {
                "N/A".to_string()
            } else {
                format!("{:.1}", temps.iter().sum::<f64>() / temps.len() as f64)
            };

            format!(
                "      <tr><td>{date}</td><td>{min_wave}</td><td>{max_wave}</td><td>{max_wind}</td><td>{avg_temp}</td></tr>\n"
            )
        })
        .collect();

    let day_count = hourly.len().div_ceil(24);
    format!(
        "  <h2>{day_count}-Day Summary</h2>
  <table>
    <thead>
      <tr><th>Date</th><th>Wave Min (m)</th><th>Wave Max (m)</th><th>Max Wind (km/h)</th><th>Avg Temp (°C)</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>"
    )
}

/// Go/no-go now plus the window outlook for every operation.
fn operation_windows(bundle: &ForecastBundle, thresholds: &Thresholds) -> String {
    let statuses = summarize_operations(bundle.current(), thresholds);
    let windows = windows_for_all_operations(&bundle.hourly, thresholds);

    let rows: String = statuses
        .iter()
        .zip(windows.iter())
        .map(|(status, (_, wins))| {
            let status_class = match status.status {
                GoStatus::Go => "go",
                GoStatus::NoGo => "no-go",
                GoStatus::Unknown => "unknown",
            };
            let next = wins.first().map_or_else(
                || "—".to_string(),
                |w| {
                    format!(
                        "{} → {}",
                        w.start_time.format("%b %-d %H:%M"),
                        w.end_time.format("%b %-d %H:%M")
                    )
                },
            );
            let longest = wins
                .iter()
                .map(|w| w.duration_hours)
                .max()
                .map_or_else(|| "—".to_string(), |h| h.to_string());

            format!(
                "      <tr><td>{}</td><td class=\"{status_class}\">{}</td><td>{}</td><td>{next}</td><td>{longest}</td></tr>\n",
                escape_html(&status.name),
                status.status,
                wins.len()
            )
        })
        .collect();

    format!(
        "  <h2>Operation Windows</h2>
  <table>
    <thead>
      <tr><th>Operation</th><th>Now</th><th>Windows</th><th>Next Window (UTC)</th><th>Longest (h)</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>"
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn with_unit(value: Option<f64>, decimals: usize, unit: &str) -> String {
    value.map_or_else(
        || "N/A".to_string(),
        |v| format!("{v:.decimals$} {unit}"),
    )
}

fn fold1(values: &[f64], pick: fn(f64, f64) -> f64) -> String {
    values
        .iter()
        .copied()
        .reduce(pick)
        .map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Longest window across all operations, if the report wants a headline.
pub fn longest_window(windows: &[(crate::types::OperationType, Vec<WeatherWindow>)]) -> Option<&WeatherWindow> {
    windows
        .iter()
        .flat_map(|(_, wins)| wins.iter())
        .max_by_key(|w| w.duration_hours)
}
