//! Offline weather-window report generator.
//!
//! Produces the same CSV exports and printable HTML report as the API, but
//! from the command line: either from a saved forecast bundle JSON or from
//! the deterministic synthetic generator (fixed seed = identical report).
//!
//! Usage:
//!   cargo run --bin window-report -- --seed 42 --out reports/
//!   cargo run --bin window-report -- --region northsea --days 5
//!   cargo run --bin window-report -- --input forecast.json --format html

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, ValueEnum};

use offshorewatch::acquisition::synthetic::hour_floor;
use offshorewatch::acquisition::SyntheticSource;
use offshorewatch::engine::{summarize_operations, windows_for_all_operations};
use offshorewatch::regions::{self, Region};
use offshorewatch::report;
use offshorewatch::types::{ForecastBundle, Thresholds, WeatherWindow};

/// Offline weather-window report generator.
#[derive(Parser)]
#[command(name = "window-report")]
struct Args {
    /// Path to a saved forecast bundle JSON. If not given, a synthetic
    /// forecast is generated.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Region id (gom, northsea, seasia, brazil, westafrica, australia,
    /// middleeast).
    #[arg(long, default_value = "gom")]
    region: String,

    /// Forecast horizon in days (synthetic mode).
    #[arg(long, default_value = "7")]
    days: u64,

    /// Seed for the synthetic generator. Unseeded runs differ each time.
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the generated files.
    #[arg(long, short, default_value = "reports")]
    out: PathBuf,

    /// Which artifacts to write.
    #[arg(long, value_enum, default_value_t = OutputFormat::All)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Csv,
    Html,
    All,
}

impl OutputFormat {
    fn wants_csv(self) -> bool {
        matches!(self, Self::Csv | Self::All)
    }

    fn wants_html(self) -> bool {
        matches!(self, Self::Html | Self::All)
    }
}

fn load_bundle(args: &Args, region: &Region) -> ForecastBundle {
    if let Some(path) = &args.input {
        let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to read {}: {}", path.display(), e);
            std::process::exit(1);
        });
        return serde_json::from_str(&contents).unwrap_or_else(|e| {
            eprintln!(
                "ERROR: {} is not a forecast bundle: {}",
                path.display(),
                e
            );
            std::process::exit(1);
        });
    }

    let source = match args.seed {
        Some(seed) => SyntheticSource::with_seed(seed),
        None => SyntheticSource::new(),
    };
    source.generate(region.location(), args.days, hour_floor(Utc::now()))
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to write {}: {}", path.display(), e);
        std::process::exit(1);
    });
    path
}

fn main() {
    let args = Args::parse();

    let region = regions::region(&args.region).unwrap_or_else(|| {
        let known: Vec<&str> = regions::REGIONS.iter().map(|r| r.id).collect();
        eprintln!(
            "ERROR: Unknown region '{}'. Valid: {}",
            args.region,
            known.join(", ")
        );
        std::process::exit(1);
    });

    let bundle = load_bundle(&args, region);
    if bundle.hourly.is_empty() {
        eprintln!("ERROR: Forecast bundle has no hourly data.");
        std::process::exit(1);
    }

    let thresholds = Thresholds::defaults();
    let summaries = summarize_operations(bundle.current(), &thresholds);
    let windows = windows_for_all_operations(&bundle.hourly, &thresholds);

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  OffshoreWatch — Weather Window Report                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Region:  {} ({})", region.name, region.id);
    match args.seed {
        Some(seed) if args.input.is_none() => {
            println!("Source:  {} (seed {})", bundle.source, seed);
        }
        _ => println!("Source:  {}", bundle.source),
    }
    println!(
        "Series:  {} hours from {} UTC",
        bundle.hourly.len(),
        bundle.hourly[0].time.format("%Y-%m-%d %H:%M")
    );
    println!();

    println!(
        "{:<28} {:>8} {:>9} {:>9}",
        "Operation", "Now", "Windows", "Longest"
    );
    println!("{}", "-".repeat(58));
    for summary in &summaries {
        let wins: &[WeatherWindow] = windows
            .iter()
            .find(|(op, _)| *op == summary.key)
            .map(|(_, w)| w.as_slice())
            .unwrap_or(&[]);
        let longest = wins.iter().map(|w| w.duration_hours).max();
        println!(
            "{:<28} {:>8} {:>9} {:>9}",
            summary.name,
            summary.status.to_string().to_uppercase(),
            wins.len(),
            longest.map_or_else(|| "—".to_string(), |h| format!("{h} h")),
        );
    }
    println!();

    if let Some(best) = report::html::longest_window(&windows) {
        println!(
            "Longest window overall: {} h ({} → {} UTC)",
            best.duration_hours,
            best.start_time.format("%b %-d %H:%M"),
            best.end_time.format("%b %-d %H:%M"),
        );
        println!();
    }

    std::fs::create_dir_all(&args.out).unwrap_or_else(|e| {
        eprintln!(
            "ERROR: Failed to create output directory {}: {}",
            args.out.display(),
            e
        );
        std::process::exit(1);
    });

    let mut written: Vec<PathBuf> = Vec::new();

    if args.format.wants_csv() {
        written.push(write_file(
            &args.out,
            &report::weather_filename(region.id),
            &report::weather_csv(&bundle),
        ));
        for (op, wins) in &windows {
            written.push(write_file(
                &args.out,
                &report::windows_filename(*op),
                &report::windows_csv(wins, *op, region.name),
            ));
        }
    }

    if args.format.wants_html() {
        let html = report::forecast_report(&bundle, region.name, &thresholds);
        let name = format!(
            "weather-report-{}-{}.html",
            region.id,
            Utc::now().format("%Y-%m-%d")
        );
        written.push(write_file(&args.out, &name, &html));
    }

    println!("Wrote:");
    for path in &written {
        println!("  {}", path.display());
    }
}
