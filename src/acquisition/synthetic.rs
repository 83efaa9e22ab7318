//! Synthetic forecast generation
//!
//! Produces statistically plausible Gulf-style marine weather without any
//! network dependency. Used by the offline report binary and anywhere a
//! deterministic forecast is needed (fixed seed = identical series).
//!
//! The generator walks hour by hour: synoptic drift via small random walks,
//! a diurnal sea-breeze cycle on wind and temperature, waves trailing the
//! wind, and a slow independent swell component.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::collections::BTreeMap;

use super::{AcquisitionError, ForecastSource};
use crate::types::{
    DailyAggregates, DailyAtmospheric, DailyMarine, ForecastBundle, HourlyObservation, Location,
};

pub const SOURCE: &str = "synthetic";

// ============================================================================
// Climate Baselines
// ============================================================================

/// Mean 10 m wind (km/h)
const BASE_WIND_KMH: f64 = 16.0;
/// Diurnal sea-breeze amplitude on wind (km/h)
const WIND_DIURNAL_KMH: f64 = 5.0;
/// Mean swell component (m)
const BASE_SWELL_M: f64 = 0.6;
/// Mean sea-level pressure (hPa)
const BASE_PRESSURE_HPA: f64 = 1014.0;
/// Mean 2 m air temperature (°C)
const BASE_TEMP_C: f64 = 28.5;
/// Diurnal temperature amplitude (°C)
const TEMP_DIURNAL_C: f64 = 2.2;
/// Clear-day visibility ceiling (m)
const MAX_VISIBILITY_M: f64 = 24_140.0;

/// Synthetic forecast source.
///
/// Carries only a seed; each fetch builds a fresh generator, so the same
/// seeded source yields the same series on every call.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    seed: Option<u64>,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Generate a bundle starting at `start` (callers normally pass the
    /// current hour; tests pin a fixed instant).
    pub fn generate(&self, location: Location, days: u64, start: DateTime<Utc>) -> ForecastBundle {
        let rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut walker = WeatherWalk::new(rng);

        let hours = days.saturating_mul(24) as usize;
        let mut hourly = Vec::with_capacity(hours);
        for i in 0..hours {
            let time = start + Duration::hours(i as i64);
            hourly.push(walker.step(time));
        }

        ForecastBundle {
            location,
            fetched_at: Utc::now(),
            source: SOURCE.to_string(),
            daily: aggregate_daily(&hourly),
            hourly,
        }
    }
}

#[async_trait]
impl ForecastSource for SyntheticSource {
    async fn fetch_forecast(
        &self,
        location: Location,
        days: u64,
    ) -> Result<ForecastBundle, AcquisitionError> {
        let start = hour_floor(Utc::now());
        Ok(self.generate(location, days, start))
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}

// ============================================================================
// Hour-by-hour walk
// ============================================================================

struct WeatherWalk {
    rng: StdRng,
    noise: Normal<f64>,

    // Slowly drifting synoptic state
    wind_anomaly_kmh: f64,
    swell_m: f64,
    pressure_anomaly_hpa: f64,
    wind_direction_deg: f64,
}

impl WeatherWalk {
    fn new(rng: StdRng) -> Self {
        Self {
            rng,
            noise: Normal::new(0.0, 1.0).expect("unit normal"),
            wind_anomaly_kmh: 0.0,
            swell_m: BASE_SWELL_M,
            pressure_anomaly_hpa: 0.0,
            wind_direction_deg: 140.0,
        }
    }

    fn sample(&mut self) -> f64 {
        self.noise.sample(&mut self.rng)
    }

    fn step(&mut self, time: DateTime<Utc>) -> HourlyObservation {
        // Synoptic drift: mean-reverting walks keep multi-day structure
        // without running away.
        self.wind_anomaly_kmh = (self.wind_anomaly_kmh * 0.97 + self.sample() * 1.4)
            .clamp(-10.0, 18.0);
        self.swell_m = (self.swell_m + self.sample() * 0.05).clamp(0.2, 2.5);
        self.pressure_anomaly_hpa =
            (self.pressure_anomaly_hpa * 0.98 + self.sample() * 0.35).clamp(-9.0, 9.0);
        self.wind_direction_deg =
            (self.wind_direction_deg + self.sample() * 6.0).rem_euclid(360.0);

        let hour = f64::from(time.hour());
        // Sea breeze peaks mid-afternoon local; series is UTC so the phase
        // lands around 21Z for the Gulf.
        let diurnal = ((hour - 15.0) / 24.0 * std::f64::consts::TAU).cos();

        let wind = (BASE_WIND_KMH + self.wind_anomaly_kmh + WIND_DIURNAL_KMH * diurnal)
            .max(2.0);
        let gust_factor = (1.3 + self.sample() * 0.12).max(1.05);
        let gusts = wind * gust_factor;

        // Wind sea trails the wind; total significant height adds swell.
        let wind_wave = (wind * 0.045 - 0.25).max(0.05);
        let wave = wind_wave + self.swell_m * 0.8 + self.sample().abs() * 0.08;
        let period = 4.5 + wave * 1.6 + self.sample() * 0.4;

        let temperature = BASE_TEMP_C + TEMP_DIURNAL_C * diurnal + self.sample() * 0.4;
        let pressure = BASE_PRESSURE_HPA + self.pressure_anomaly_hpa
            - 1.2 * ((hour - 10.0) / 12.0 * std::f64::consts::TAU).cos();

        // Visibility is clear except for the occasional squall hour.
        let visibility = if self.rng.gen_bool(0.04) {
            self.rng.gen_range(2_000.0..9_000.0)
        } else {
            MAX_VISIBILITY_M
        };

        // Upstream feeds drop readings now and then; mirror that so
        // downstream None handling stays exercised.
        let visibility = (!self.rng.gen_bool(0.02)).then_some(visibility);
        let pressure = (!self.rng.gen_bool(0.015)).then_some(pressure);

        HourlyObservation {
            time,
            wave_height: Some(round2(wave)),
            swell_height: Some(round2(self.swell_m)),
            wind_wave_height: Some(round2(wind_wave)),
            wave_period: Some(round1(period.max(2.0))),
            wave_direction: Some(round1(self.wind_direction_deg)),
            wind_speed: Some(round1(wind)),
            wind_gusts: Some(round1(gusts)),
            wind_direction: Some(round1(self.wind_direction_deg)),
            visibility: visibility.map(round1),
            pressure: pressure.map(round1),
            temperature: Some(round1(temperature)),
        }
    }
}

// ============================================================================
// Daily aggregation
// ============================================================================

fn aggregate_daily(hourly: &[HourlyObservation]) -> DailyAggregates {
    let mut marine: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    let mut atmos: BTreeMap<NaiveDate, (Option<f64>, Option<f64>, Option<f64>)> = BTreeMap::new();

    for obs in hourly {
        let date = obs.time.date_naive();
        let wave_max = marine.entry(date).or_default();
        *wave_max = fold_max(*wave_max, obs.wave_height);

        let (temp_max, temp_min, wind_max) = atmos.entry(date).or_default();
        *temp_max = fold_max(*temp_max, obs.temperature);
        *temp_min = fold_min(*temp_min, obs.temperature);
        *wind_max = fold_max(*wind_max, obs.wind_speed);
    }

    DailyAggregates {
        marine: marine
            .into_iter()
            .map(|(date, wave_height_max)| DailyMarine {
                date,
                wave_height_max,
            })
            .collect(),
        atmospheric: atmos
            .into_iter()
            .map(|(date, (temp_max, temp_min, wind_speed_max))| DailyAtmospheric {
                date,
                temp_max,
                temp_min,
                wind_speed_max,
            })
            .collect(),
    }
}

fn fold_max(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a.max(v)),
        (acc, value) => acc.or(value),
    }
}

fn fold_min(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a.min(v)),
        (acc, value) => acc.or(value),
    }
}

/// Truncate to the start of the hour.
pub fn hour_floor(time: DateTime<Utc>) -> DateTime<Utc> {
    time - Duration::minutes(i64::from(time.minute()))
        - Duration::seconds(i64::from(time.second()))
        - Duration::nanoseconds(i64::from(time.nanosecond()))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn gulf() -> Location {
        Location {
            latitude: 27.5,
            longitude: -90.5,
        }
    }

    fn midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 22, 0, 0, 0).unwrap()
    }

    #[test]
    fn fixed_seed_reproduces_the_series() {
        let source = SyntheticSource::with_seed(42);
        let a = source.generate(gulf(), 3, midnight());
        let b = source.generate(gulf(), 3, midnight());
        assert_eq!(a.hourly, b.hourly);
        assert_eq!(a.daily, b.daily);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = SyntheticSource::with_seed(1).generate(gulf(), 2, midnight());
        let b = SyntheticSource::with_seed(2).generate(gulf(), 2, midnight());
        assert_ne!(a.hourly, b.hourly);
    }

    #[test]
    fn series_is_hourly_and_complete() {
        let bundle = SyntheticSource::with_seed(7).generate(gulf(), 7, midnight());
        assert_eq!(bundle.hourly.len(), 7 * 24);
        assert_eq!(bundle.source, "synthetic");
        for pair in bundle.hourly.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, Duration::hours(1));
        }
    }

    #[test]
    fn values_stay_physically_plausible() {
        let bundle = SyntheticSource::with_seed(99).generate(gulf(), 7, midnight());
        for obs in &bundle.hourly {
            let wind = obs.wind_speed.unwrap();
            let gusts = obs.wind_gusts.unwrap();
            let wave = obs.wave_height.unwrap();
            assert!(wind >= 2.0 && wind < 80.0, "wind {wind}");
            assert!(gusts >= wind, "gusts {gusts} below wind {wind}");
            assert!(wave > 0.0 && wave < 8.0, "wave {wave}");
            assert!(obs.wave_period.unwrap() >= 2.0);
            let temp = obs.temperature.unwrap();
            assert!((15.0..45.0).contains(&temp), "temp {temp}");
            if let Some(vis) = obs.visibility {
                assert!((500.0..=MAX_VISIBILITY_M).contains(&vis));
            }
        }
    }

    #[test]
    fn daily_aggregates_cover_every_date() {
        let bundle = SyntheticSource::with_seed(5).generate(gulf(), 5, midnight());
        assert_eq!(bundle.daily.marine.len(), 5);
        assert_eq!(bundle.daily.atmospheric.len(), 5);

        let first = &bundle.daily.atmospheric[0];
        assert_eq!(first.date, midnight().date_naive());
        assert!(first.temp_max >= first.temp_min);

        let day_one_max = bundle.hourly[..24]
            .iter()
            .filter_map(|o| o.wave_height)
            .fold(f64::MIN, f64::max);
        assert_eq!(bundle.daily.marine[0].wave_height_max, Some(day_one_max));
    }

    #[test]
    fn hour_floor_truncates_to_the_hour() {
        let t = Utc.with_ymd_and_hms(2026, 8, 22, 13, 47, 31).unwrap();
        assert_eq!(
            hour_floor(t),
            Utc.with_ymd_and_hms(2026, 8, 22, 13, 0, 0).unwrap()
        );
    }
}
