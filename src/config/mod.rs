//! Application Configuration Module
//!
//! Deployment-level settings loaded from TOML files: bind address, site
//! region, forecast horizon, cache lifetimes, storage paths.
//!
//! ## Loading Order
//!
//! 1. Explicit path (the `--config` CLI flag)
//! 2. `OFFSHOREWATCH_CONFIG` environment variable (path to TOML file)
//! 3. `offshorewatch.toml` in the current working directory
//! 4. Built-in defaults
//!
//! There is no global config. `main()` loads an [`AppConfig`] once and hands
//! it to whatever needs it; the evaluation engine itself never reads config —
//! it takes thresholds as arguments.

mod app_config;
pub mod validation;

pub use app_config::*;
