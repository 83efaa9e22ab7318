//! Application Configuration - deployment-level settings as operator-tunable TOML values
//!
//! Everything an installation might tune (bind address, site region, forecast
//! horizon, cache lifetimes, storage paths) is a field in this module. Each
//! struct implements `Default` with the built-in values, ensuring zero-change
//! behavior when no config file is present.
//!
//! Operation thresholds are NOT here: those live in the settings store and are
//! editable at runtime through the API. This file covers what must be known
//! before the server starts.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::regions;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an offshorewatch deployment.
///
/// Load with `AppConfig::load()` which searches:
/// 1. Explicit path (the `--config` CLI flag)
/// 2. `$OFFSHOREWATCH_CONFIG` env var
/// 3. `./offshorewatch.toml`
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity: which region this installation watches
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Forecast acquisition parameters
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Per-source cache lifetimes
    #[serde(default)]
    pub cache: CacheConfig,

    /// Background refresh loop
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// On-disk storage paths
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound HTTP client tuning
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            server: ServerConfig::default(),
            forecast: ForecastConfig::default(),
            cache: CacheConfig::default(),
            refresh: RefreshConfig::default(),
            storage: StorageConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. Explicit path (hard error if unreadable — the operator asked for it)
    /// 2. `$OFFSHOREWATCH_CONFIG` environment variable
    /// 3. `./offshorewatch.toml` in the current working directory
    /// 4. Built-in defaults
    ///
    /// Env-var and local-file failures fall back with a warning; only an
    /// explicit `--config` path fails hard.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // 1. Explicit CLI path
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), region = %config.site.region, "Loaded config from --config");
            return Ok(config);
        }

        // 2. Check env var
        if let Ok(path) = std::env::var("OFFSHOREWATCH_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), region = %config.site.region, "Loaded config from OFFSHOREWATCH_CONFIG");
                        return Ok(config);
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from OFFSHOREWATCH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "OFFSHOREWATCH_CONFIG points to non-existent file, falling back");
            }
        }

        // 3. Check ./offshorewatch.toml
        let local = PathBuf::from("offshorewatch.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(region = %config.site.region, "Loaded config from ./offshorewatch.toml");
                    return Ok(config);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./offshorewatch.toml, using defaults");
                }
            }
        }

        // 4. Defaults
        info!("No offshorewatch.toml found — using built-in defaults");
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Two-pass: check for unknown keys first (warnings only)
        let typo_warnings = super::validation::validate_unknown_keys(&contents);
        for w in &typo_warnings {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;

        let (range_errors, range_warnings) = super::validation::validate_ranges(&config);
        for w in &range_warnings {
            warn!("{}", w);
        }
        if !range_errors.is_empty() {
            return Err(ConfigError::Validation(range_errors));
        }

        Ok(config)
    }

    /// Serialize the current config to a TOML string (for `--print-config`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate structural consistency.
    ///
    /// Rules:
    /// - The bind address must parse as a socket address
    /// - The region id must be one we ship coordinates for
    /// - Forecast horizon must fit what Open-Meteo serves (1-16 days)
    /// - Cache lifetimes and refresh intervals must be non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr '{}' is not a valid socket address (expected host:port)",
                self.server.addr
            ));
        }

        if regions::region(&self.site.region).is_none() {
            let known: Vec<&str> = regions::REGIONS.iter().map(|r| r.id).collect();
            errors.push(format!(
                "site.region '{}' is unknown (valid: {})",
                self.site.region,
                known.join(", ")
            ));
        }

        if self.forecast.days == 0 || self.forecast.days > 16 {
            errors.push(format!(
                "forecast.days = {} is outside the supported range (1-16)",
                self.forecast.days
            ));
        }

        Self::check_nonzero(self.cache.weather_ttl_minutes, "cache.weather_ttl_minutes", &mut errors);
        Self::check_nonzero(self.cache.storms_ttl_minutes, "cache.storms_ttl_minutes", &mut errors);
        Self::check_nonzero(self.cache.seismic_ttl_minutes, "cache.seismic_ttl_minutes", &mut errors);
        Self::check_nonzero(self.cache.buoys_ttl_minutes, "cache.buoys_ttl_minutes", &mut errors);
        Self::check_nonzero(self.cache.sweep_interval_minutes, "cache.sweep_interval_minutes", &mut errors);
        Self::check_nonzero(self.refresh.interval_secs, "refresh.interval_secs", &mut errors);
        Self::check_nonzero(self.http.timeout_secs, "http.timeout_secs", &mut errors);

        if self.storage.data_dir.as_os_str().is_empty() {
            errors.push("storage.data_dir must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// The effective site coordinates: explicit overrides win, otherwise the
    /// region's anchor point.
    pub fn site_location(&self) -> crate::types::Location {
        let region = regions::region_or_default(&self.site.region);
        crate::types::Location {
            latitude: self.site.latitude.unwrap_or(region.latitude),
            longitude: self.site.longitude.unwrap_or(region.longitude),
        }
    }

    fn check_nonzero(value: u64, key: &str, errors: &mut Vec<String>) {
        if value == 0 {
            errors.push(format!("{} must be > 0", key));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Site
// ============================================================================

/// Which patch of ocean this installation watches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Region id (see `regions::REGIONS` for the shipped set)
    #[serde(default = "default_region")]
    pub region: String,

    /// Optional display name override (defaults to the region's name)
    #[serde(default)]
    pub name: String,

    /// Optional latitude override — forecasts are fetched here instead of
    /// the region anchor (e.g. a specific platform)
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Optional longitude override
    #[serde(default)]
    pub longitude: Option<f64>,
}

fn default_region() -> String {
    regions::DEFAULT_REGION_ID.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            name: String::new(),
            latitude: None,
            longitude: None,
        }
    }
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by the `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Forecast
// ============================================================================

/// Forecast acquisition parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Forecast horizon in days (Open-Meteo serves up to 16)
    #[serde(default = "default_forecast_days")]
    pub days: u64,
}

fn default_forecast_days() -> u64 {
    7
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days: default_forecast_days(),
        }
    }
}

// ============================================================================
// Cache
// ============================================================================

/// How long each upstream payload stays fresh before a refetch.
///
/// Lifetimes track how often the upstream actually publishes: marine
/// forecasts update hourly (15 min is generous), hurricane advisories every
/// 3-6 hours, earthquake feeds continuously, buoy observations every hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_weather_ttl")]
    pub weather_ttl_minutes: u64,

    #[serde(default = "default_storms_ttl")]
    pub storms_ttl_minutes: u64,

    #[serde(default = "default_seismic_ttl")]
    pub seismic_ttl_minutes: u64,

    #[serde(default = "default_buoys_ttl")]
    pub buoys_ttl_minutes: u64,

    /// How often the background sweeper evicts expired entries
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,
}

fn default_weather_ttl() -> u64 {
    15
}
fn default_storms_ttl() -> u64 {
    30
}
fn default_seismic_ttl() -> u64 {
    5
}
fn default_buoys_ttl() -> u64 {
    60
}
fn default_sweep_interval() -> u64 {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_minutes: default_weather_ttl(),
            storms_ttl_minutes: default_storms_ttl(),
            seismic_ttl_minutes: default_seismic_ttl(),
            buoys_ttl_minutes: default_buoys_ttl(),
            sweep_interval_minutes: default_sweep_interval(),
        }
    }
}

// ============================================================================
// Refresh
// ============================================================================

/// Background refresh loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// How often the loop wakes to check for expired data
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,

    /// Fetch everything immediately at startup instead of waiting one tick
    #[serde(default = "default_refresh_on_start")]
    pub on_start: bool,
}

fn default_refresh_interval() -> u64 {
    60
}
fn default_refresh_on_start() -> bool {
    true
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
            on_start: default_refresh_on_start(),
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

/// On-disk storage paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the sled database (cache + settings trees)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/offshorewatch")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Outbound HTTP client tuning for the upstream data sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header. NOAA asks automated clients to identify themselves.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_http_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("offshorewatch/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_defaults_match_documented_lifetimes() {
        let config = AppConfig::default();
        assert_eq!(config.cache.weather_ttl_minutes, 15);
        assert_eq!(config.cache.storms_ttl_minutes, 30);
        assert_eq!(config.cache.seismic_ttl_minutes, 5);
        assert_eq!(config.cache.buoys_ttl_minutes, 60);
        assert_eq!(config.forecast.days, 7);
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [site]
            region = "northsea"
            "#,
        )
        .unwrap();
        assert_eq!(config.site.region, "northsea");
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.cache.weather_ttl_minutes, 15);
    }

    #[test]
    fn test_unknown_region_fails_validation() {
        let mut config = AppConfig::default();
        config.site.region = "atlantis".to_string();
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("site.region"), "unexpected message: {msg}");
        assert!(msg.contains("gom"), "message should list valid ids: {msg}");
    }

    #[test]
    fn test_bad_addr_fails_validation() {
        let mut config = AppConfig::default();
        config.server.addr = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_collects_multiple_errors() {
        let mut config = AppConfig::default();
        config.forecast.days = 0;
        config.cache.weather_ttl_minutes = 0;
        config.refresh.interval_secs = 0;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.len() >= 3, "expected all errors reported, got {errors:?}");
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_forecast_days_upper_bound() {
        let mut config = AppConfig::default();
        config.forecast.days = 17;
        assert!(config.validate().is_err());
        config.forecast.days = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_site_location_prefers_overrides() {
        let mut config = AppConfig::default();
        let anchor = config.site_location();
        assert!((anchor.latitude - 27.5).abs() < 1e-9);

        config.site.latitude = Some(28.1);
        config.site.longitude = Some(-89.2);
        let overridden = config.site_location();
        assert!((overridden.latitude - 28.1).abs() < 1e-9);
        assert!((overridden.longitude - (-89.2)).abs() < 1e-9);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = AppConfig::default();
        let toml_str = config.to_toml().unwrap();
        let reparsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.server.addr, config.server.addr);
        assert_eq!(reparsed.site.region, config.site.region);
        assert_eq!(reparsed.cache.buoys_ttl_minutes, config.cache.buoys_ttl_minutes);
    }
}
