//! Open-Meteo forecast acquisition
//!
//! Two endpoints serve one site: the marine API (waves, swell) and the
//! weather API (wind, visibility, temperature, pressure). Both are fetched
//! concurrently and zipped by index into one hourly series — with
//! `timezone=UTC` and the same horizon both axes carry identical hour
//! stamps, the marine axis is authoritative, and a shorter atmospheric
//! response simply leaves those fields empty.
//!
//! Upstream null handling is strict: a JSON null stays `None` all the way
//! through, it never becomes a zero.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{AcquisitionError, ForecastSource};
use crate::types::{
    DailyAggregates, DailyAtmospheric, DailyMarine, ForecastBundle, HourlyObservation, Location,
};

pub const MARINE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";
pub const WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

const SOURCE: &str = "open-meteo";

const MARINE_HOURLY_VARS: &str =
    "wave_height,wave_direction,wave_period,swell_wave_height,wind_wave_height";
const MARINE_DAILY_VARS: &str = "wave_height_max";
const WEATHER_HOURLY_VARS: &str =
    "temperature_2m,wind_speed_10m,wind_direction_10m,wind_gusts_10m,visibility,pressure_msl";
const WEATHER_DAILY_VARS: &str = "temperature_2m_max,temperature_2m_min,wind_speed_10m_max";

/// Open-Meteo client for one marine + one weather endpoint.
pub struct OpenMeteoSource {
    http: reqwest::Client,
    marine_url: String,
    weather_url: String,
}

impl OpenMeteoSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_urls(http, MARINE_URL, WEATHER_URL)
    }

    /// Point at non-default endpoints (tests, self-hosted instances).
    pub fn with_urls(http: reqwest::Client, marine_url: &str, weather_url: &str) -> Self {
        Self {
            http,
            marine_url: marine_url.to_string(),
            weather_url: weather_url.to_string(),
        }
    }

    async fn fetch_marine(
        &self,
        location: Location,
        days: u64,
    ) -> Result<MarineResponse, AcquisitionError> {
        let resp = self
            .http
            .get(&self.marine_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("hourly", MARINE_HOURLY_VARS.to_string()),
                ("daily", MARINE_DAILY_VARS.to_string()),
                ("timezone", "UTC".to_string()),
                ("forecast_days", days.to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AcquisitionError::UpstreamStatus {
                source: SOURCE,
                status: resp.status(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn fetch_weather(
        &self,
        location: Location,
        days: u64,
    ) -> Result<WeatherResponse, AcquisitionError> {
        let resp = self
            .http
            .get(&self.weather_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("hourly", WEATHER_HOURLY_VARS.to_string()),
                ("daily", WEATHER_DAILY_VARS.to_string()),
                ("timezone", "UTC".to_string()),
                ("forecast_days", days.to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AcquisitionError::UpstreamStatus {
                source: SOURCE,
                status: resp.status(),
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoSource {
    async fn fetch_forecast(
        &self,
        location: Location,
        days: u64,
    ) -> Result<ForecastBundle, AcquisitionError> {
        let (marine, weather) = futures::future::try_join(
            self.fetch_marine(location, days),
            self.fetch_weather(location, days),
        )
        .await?;

        let bundle = merge_bundle(location, &marine, &weather)?;
        debug!(
            hours = bundle.hourly.len(),
            lat = location.latitude,
            lon = location.longitude,
            "Forecast fetched"
        );
        Ok(bundle)
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}

// ============================================================================
// Raw response shapes
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct MarineResponse {
    #[serde(default)]
    hourly: MarineHourly,
    #[serde(default)]
    daily: MarineDaily,
}

#[derive(Debug, Default, Deserialize)]
struct MarineHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    wave_height: Vec<Option<f64>>,
    #[serde(default)]
    wave_direction: Vec<Option<f64>>,
    #[serde(default)]
    wave_period: Vec<Option<f64>>,
    #[serde(default)]
    swell_wave_height: Vec<Option<f64>>,
    #[serde(default)]
    wind_wave_height: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct MarineDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    wave_height_max: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    hourly: WeatherHourly,
    #[serde(default)]
    daily: WeatherDaily,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_gusts_10m: Vec<Option<f64>>,
    #[serde(default)]
    visibility: Vec<Option<f64>>,
    #[serde(default)]
    pressure_msl: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

// ============================================================================
// Normalization
// ============================================================================

fn merge_bundle(
    location: Location,
    marine: &MarineResponse,
    weather: &WeatherResponse,
) -> Result<ForecastBundle, AcquisitionError> {
    let mut hourly = Vec::with_capacity(marine.hourly.time.len());
    for (i, stamp) in marine.hourly.time.iter().enumerate() {
        hourly.push(HourlyObservation {
            time: parse_hour(stamp)?,
            wave_height: at(&marine.hourly.wave_height, i),
            swell_height: at(&marine.hourly.swell_wave_height, i),
            wind_wave_height: at(&marine.hourly.wind_wave_height, i),
            wave_period: at(&marine.hourly.wave_period, i),
            wave_direction: at(&marine.hourly.wave_direction, i),
            wind_speed: at(&weather.hourly.wind_speed_10m, i),
            wind_gusts: at(&weather.hourly.wind_gusts_10m, i),
            wind_direction: at(&weather.hourly.wind_direction_10m, i),
            visibility: at(&weather.hourly.visibility, i),
            pressure: at(&weather.hourly.pressure_msl, i),
            temperature: at(&weather.hourly.temperature_2m, i),
        });
    }

    let marine_daily = marine
        .daily
        .time
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Ok(DailyMarine {
                date: parse_date(d)?,
                wave_height_max: at(&marine.daily.wave_height_max, i),
            })
        })
        .collect::<Result<Vec<_>, AcquisitionError>>()?;

    let atmospheric_daily = weather
        .daily
        .time
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Ok(DailyAtmospheric {
                date: parse_date(d)?,
                temp_max: at(&weather.daily.temperature_2m_max, i),
                temp_min: at(&weather.daily.temperature_2m_min, i),
                wind_speed_max: at(&weather.daily.wind_speed_10m_max, i),
            })
        })
        .collect::<Result<Vec<_>, AcquisitionError>>()?;

    Ok(ForecastBundle {
        location,
        fetched_at: Utc::now(),
        source: SOURCE.to_string(),
        hourly,
        daily: DailyAggregates {
            marine: marine_daily,
            atmospheric: atmospheric_daily,
        },
    })
}

fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Hour stamps arrive as `2026-01-15T13:00` (no offset; `timezone=UTC`).
fn parse_hour(stamp: &str) -> Result<DateTime<Utc>, AcquisitionError> {
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M")
        .map(|n| n.and_utc())
        .map_err(|e| AcquisitionError::Malformed {
            source: SOURCE,
            message: format!("bad hour stamp '{stamp}': {e}"),
        })
}

fn parse_date(date: &str) -> Result<NaiveDate, AcquisitionError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| AcquisitionError::Malformed {
        source: SOURCE,
        message: format!("bad date '{date}': {e}"),
    })
}
