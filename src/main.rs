//! OffshoreWatch - offshore operations weather and safety planning
//!
//! HTTP service that fetches marine forecasts, tropical storm advisories,
//! earthquake feeds, and buoy observations for an offshore region, evaluates
//! per-operation weather windows against configurable safety thresholds, and
//! serves the results over a REST API with CSV/HTML exports.
//!
//! # Usage
//!
//! ```bash
//! # Run against the live upstream feeds
//! cargo run --release
//!
//! # Run fully offline with the synthetic forecast generator
//! cargo run --release -- --synthetic
//!
//! # Point at a specific config file
//! cargo run --release -- --config /etc/offshorewatch.toml
//! ```
//!
//! # Environment Variables
//!
//! - `OFFSHOREWATCH_CONFIG`: Path to the TOML config file
//! - `OFFSHOREWATCH_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use offshorewatch::acquisition::SyntheticSource;
use offshorewatch::api::create_app;
use offshorewatch::config::AppConfig;
use offshorewatch::state::AppState;
use offshorewatch::storage::Store;
use offshorewatch::tasks;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "offshorewatch")]
#[command(about = "Offshore operations weather and safety planning service")]
#[command(version)]
struct CliArgs {
    /// Path to the TOML config file (overrides OFFSHOREWATCH_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the server bind address (default: from config, "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Use the deterministic synthetic forecast generator instead of
    /// Open-Meteo (demo / offline mode)
    #[arg(long)]
    synthetic: bool,

    /// Seed for the synthetic generator (implies --synthetic)
    #[arg(long, value_name = "SEED")]
    synthetic_seed: Option<u64>,

    /// Emit logs as JSON lines (for log shippers)
    #[arg(long)]
    log_json: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
    FeedRefresher,
    CacheSweeper,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HttpServer => write!(f, "HttpServer"),
            TaskName::FeedRefresher => write!(f, "FeedRefresher"),
            TaskName::CacheSweeper => write!(f, "CacheSweeper"),
        }
    }
}

// ============================================================================
// Task Spawning
// ============================================================================

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Spawn the feed refresh and cache sweeper tasks.
fn spawn_background_tasks(
    task_set: &mut JoinSet<Result<TaskName>>,
    state: AppState,
    cancel_token: CancellationToken,
) {
    let refresh_state = state.clone();
    let refresh_cancel = cancel_token.clone();
    task_set.spawn(async move {
        info!("[FeedRefresher] Task starting");
        tasks::run_refresh_loop(refresh_state, refresh_cancel).await;
        Ok(TaskName::FeedRefresher)
    });

    task_set.spawn(async move {
        info!("[CacheSweeper] Task starting");
        tasks::run_cache_sweeper(state, cancel_token).await;
        Ok(TaskName::CacheSweeper)
    });
}

/// Run the supervisor loop: monitor tasks, cancel everything on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("Supervisor: All tasks spawned, monitoring...");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("🛑 Supervisor: Shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("Supervisor: Task {} completed normally", task_name);
                    }
                    Some(Ok(Err(e))) => {
                        error!("Supervisor: Task failed with error: {}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("Supervisor: Task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("Supervisor: All tasks completed");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration
    let config = AppConfig::load(args.config.as_deref())?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let server_addr = args.addr.unwrap_or_else(|| config.server.addr.clone());
    let region = offshorewatch::regions::region_or_default(&config.site.region);

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  OffshoreWatch - Offshore Operations Weather & Safety Planning");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");
    info!(
        "Region: {} ({}) | Forecast horizon: {} days",
        region.name, region.id, config.forecast.days
    );

    // Open storage
    let store = Store::open(&config.storage.data_dir).with_context(|| {
        format!(
            "Failed to open storage at {}",
            config.storage.data_dir.display()
        )
    })?;

    // Wire up shared state
    let use_synthetic = args.synthetic || args.synthetic_seed.is_some();
    let mut state = AppState::new(config, store).context("Failed to initialize state")?;
    if use_synthetic {
        let source = match args.synthetic_seed {
            Some(seed) => SyntheticSource::with_seed(seed),
            None => SyntheticSource::new(),
        };
        info!("Forecast source: synthetic generator (offline mode)");
        state = state.with_forecast_source(Arc::new(source));
    }
    info!("✓ Application state initialized");

    let app = create_app(state.clone());
    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("✓ HTTP server listening on {}", server_addr);
    info!("");
    info!("  API available at: http://{}/api/v1", server_addr);
    info!("");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    // Spawn and supervise all tasks
    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut task_set, listener, app, cancel_token.clone());
    spawn_background_tasks(&mut task_set, state.clone(), cancel_token.clone());

    let outcome = run_supervisor(&mut task_set, cancel_token).await;

    // Flush settings and cache before exit
    if let Err(e) = state.store.flush() {
        error!("Failed to flush storage on shutdown: {}", e);
    }

    info!("");
    info!("✓ OffshoreWatch shutdown complete");
    outcome
}
