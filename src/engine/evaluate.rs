//! Condition evaluation: one observation against one limit set

use serde::{Deserialize, Serialize};

use crate::types::{GoStatus, HourlyObservation, LimitSet, OperationStatus, OperationType, Thresholds};
use crate::units;

/// Decide whether one forecast hour is within an operation's limits.
///
/// The evaluation is a conjunction over every bound present in `limits`;
/// the first failed check settles the verdict. Unit handling per bound:
/// wind bounds are knots against km/h observations (converted here), wave
/// bounds are meters against meters (upper bound inclusive: equality
/// passes), visibility is a lower bound in kilometers against meters.
///
/// Missing data is handled permissively: a bound whose observation field is
/// `None` is skipped rather than failed, and an hour with no applicable
/// fields at all evaluates `true`. That policy is deliberate — absence of
/// evidence of violation is not evidence of violation — but it means a GO
/// verdict can rest on hours with incomplete telemetry, which callers
/// surfacing safety decisions should disclose.
pub fn is_within_limits(obs: &HourlyObservation, limits: &LimitSet) -> bool {
    if let (Some(max_kt), Some(wind_kmh)) = (limits.max_wind_speed, obs.wind_speed) {
        if units::kmh_to_knots(wind_kmh) > max_kt {
            return false;
        }
    }

    if let (Some(max_kt), Some(gusts_kmh)) = (limits.max_wind_gusts, obs.wind_gusts) {
        if units::kmh_to_knots(gusts_kmh) > max_kt {
            return false;
        }
    }

    if let (Some(max_m), Some(wave_m)) = (limits.max_wave_height, obs.wave_height) {
        if wave_m > max_m {
            return false;
        }
    }

    if let (Some(min_km), Some(vis_m)) = (limits.min_visibility, obs.visibility) {
        if units::meters_to_km(vis_m) < min_km {
            return false;
        }
    }

    // min_ceiling and max_current_speed have no field in the hourly model;
    // under the permissive policy they never veto a forecast hour.
    true
}

/// Summarize go/no-go for every operation type against one current
/// observation, in the stable [`OperationType::ALL`] order.
///
/// An operation with no configured limit set, or any query without a
/// current observation, reports [`GoStatus::Unknown`]. Pure and
/// deterministic given fixed inputs.
pub fn summarize_operations(
    current: Option<&HourlyObservation>,
    thresholds: &Thresholds,
) -> Vec<OperationStatus> {
    OperationType::ALL
        .iter()
        .map(|&op| {
            let status = match (thresholds.limits_for(op), current) {
                (Some(limits), Some(obs)) => {
                    if is_within_limits(obs, limits) {
                        GoStatus::Go
                    } else {
                        GoStatus::NoGo
                    }
                }
                _ => GoStatus::Unknown,
            };
            OperationStatus {
                key: op,
                name: op.display_name().to_string(),
                status,
            }
        })
        .collect()
}

// ============================================================================
// Threshold proximity bands (dashboard display)
// ============================================================================

/// How close a value sits to its threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdBand {
    Safe,
    Caution,
    Exceeded,
    Unknown,
}

impl std::fmt::Display for ThresholdBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdBand::Safe => write!(f, "safe"),
            ThresholdBand::Caution => write!(f, "caution"),
            ThresholdBand::Exceeded => write!(f, "exceeded"),
            ThresholdBand::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which direction a bound constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// Lower is better (wind, wave): caution starts at 70% of the limit.
    Upper,
    /// Higher is better (visibility): caution starts at 80% of the limit.
    Lower,
}

/// Band a value against a threshold for display purposes.
///
/// This is a presentation aid; the go/no-go verdict itself comes from
/// [`is_within_limits`], which only distinguishes pass/fail.
pub fn proximity_band(value: Option<f64>, threshold: f64, kind: BoundKind) -> ThresholdBand {
    let Some(value) = value else {
        return ThresholdBand::Unknown;
    };

    match kind {
        BoundKind::Upper => {
            if value <= threshold * 0.7 {
                ThresholdBand::Safe
            } else if value <= threshold {
                ThresholdBand::Caution
            } else {
                ThresholdBand::Exceeded
            }
        }
        BoundKind::Lower => {
            if value >= threshold {
                ThresholdBand::Safe
            } else if value >= threshold * 0.8 {
                ThresholdBand::Caution
            } else {
                ThresholdBand::Exceeded
            }
        }
    }
}

/// Proximity of one observation to each bound an operation configures.
///
/// A field is `None` when the limit set has no bound on that dimension;
/// a configured bound with missing data bands as `Unknown`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitBands {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<ThresholdBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gusts: Option<ThresholdBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave_height: Option<ThresholdBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ThresholdBand>,
}

/// Band every configured bound of `limits` against one observation, with
/// the same unit conversions the evaluator applies.
pub fn bands_for(obs: &HourlyObservation, limits: &LimitSet) -> LimitBands {
    LimitBands {
        wind_speed: limits.max_wind_speed.map(|max_kt| {
            proximity_band(
                obs.wind_speed.map(units::kmh_to_knots),
                max_kt,
                BoundKind::Upper,
            )
        }),
        wind_gusts: limits.max_wind_gusts.map(|max_kt| {
            proximity_band(
                obs.wind_gusts.map(units::kmh_to_knots),
                max_kt,
                BoundKind::Upper,
            )
        }),
        wave_height: limits
            .max_wave_height
            .map(|max_m| proximity_band(obs.wave_height, max_m, BoundKind::Upper)),
        visibility: limits.min_visibility.map(|min_km| {
            proximity_band(
                obs.visibility.map(units::meters_to_km),
                min_km,
                BoundKind::Lower,
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hour() -> HourlyObservation {
        HourlyObservation::empty(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
    }

    fn wind_limit(max_kt: f64) -> LimitSet {
        LimitSet {
            max_wind_speed: Some(max_kt),
            ..LimitSet::default()
        }
    }

    #[test]
    fn wind_conversion_boundary_kmh_to_knots() {
        // 38 km/h ≈ 20.52 kt exceeds a 20 kt limit; 37 km/h ≈ 19.98 kt does not.
        let limits = wind_limit(20.0);

        let mut gusty = hour();
        gusty.wind_speed = Some(38.0);
        assert!(!is_within_limits(&gusty, &limits), "38 km/h should exceed 20 kt");

        let mut calm = hour();
        calm.wind_speed = Some(37.0);
        assert!(is_within_limits(&calm, &limits), "37 km/h should pass 20 kt");
    }

    #[test]
    fn wave_upper_bound_is_inclusive() {
        let limits = LimitSet {
            max_wave_height: Some(2.0),
            ..LimitSet::default()
        };

        let mut at_limit = hour();
        at_limit.wave_height = Some(2.0);
        assert!(is_within_limits(&at_limit, &limits), "equality should pass");

        let mut over = hour();
        over.wave_height = Some(2.01);
        assert!(!is_within_limits(&over, &limits));
    }

    #[test]
    fn visibility_is_a_lower_bound_in_km() {
        let limits = LimitSet {
            min_visibility: Some(4.8),
            ..LimitSet::default()
        };

        let mut foggy = hour();
        foggy.visibility = Some(3000.0); // 3 km
        assert!(!is_within_limits(&foggy, &limits));

        let mut clear = hour();
        clear.visibility = Some(10_000.0); // 10 km
        assert!(is_within_limits(&clear, &limits));
    }

    #[test]
    fn gusts_are_checked_independently_of_sustained_wind() {
        let limits = LimitSet {
            max_wind_speed: Some(35.0),
            max_wind_gusts: Some(45.0),
            ..LimitSet::default()
        };

        let mut obs = hour();
        obs.wind_speed = Some(50.0); // ≈27 kt, fine
        obs.wind_gusts = Some(90.0); // ≈48.6 kt, exceeds 45 kt
        assert!(!is_within_limits(&obs, &limits));
    }

    #[test]
    fn missing_field_skips_that_check() {
        let limits = LimitSet {
            max_wind_speed: Some(20.0),
            max_wave_height: Some(2.0),
            ..LimitSet::default()
        };

        let mut obs = hour();
        obs.wind_speed = None;
        obs.wave_height = Some(1.0);
        assert!(
            is_within_limits(&obs, &limits),
            "null wind must skip the wind check, not fail it"
        );
    }

    #[test]
    fn observation_with_no_applicable_fields_passes() {
        let limits = wind_limit(20.0);
        assert!(is_within_limits(&hour(), &limits));
    }

    #[test]
    fn ceiling_and_current_bounds_never_veto_forecast_hours() {
        let limits = LimitSet {
            min_ceiling: Some(305.0),
            max_current_speed: Some(1.5),
            ..LimitSet::default()
        };
        let mut obs = hour();
        obs.wave_height = Some(5.0); // irrelevant: no wave bound configured
        assert!(is_within_limits(&obs, &limits));
    }

    #[test]
    fn summary_reports_unknown_for_unconfigured_operations() {
        let registry = Thresholds {
            helicopter_ops: Some(wind_limit(35.0)),
            crane_lift: Some(wind_limit(20.0)),
            ..Thresholds::default()
        };

        let mut obs = hour();
        obs.wind_speed = Some(45.0); // ≈24.3 kt: go for heli, no-go for crane

        let summary = summarize_operations(Some(&obs), &registry);
        assert_eq!(summary.len(), 6);

        let by_key = |key: OperationType| {
            summary
                .iter()
                .find(|s| s.key == key)
                .map(|s| s.status)
                .unwrap()
        };
        assert_eq!(by_key(OperationType::HelicopterOps), GoStatus::Go);
        assert_eq!(by_key(OperationType::CraneLift), GoStatus::NoGo);
        assert_eq!(by_key(OperationType::DivingOps), GoStatus::Unknown);
        assert_eq!(by_key(OperationType::RigMove), GoStatus::Unknown);
        assert_eq!(by_key(OperationType::PersonnelTransferBoat), GoStatus::Unknown);
        assert_eq!(by_key(OperationType::PersonnelTransferW2W), GoStatus::Unknown);
    }

    #[test]
    fn summary_without_observation_is_all_unknown() {
        let summary = summarize_operations(None, &Thresholds::defaults());
        assert!(summary.iter().all(|s| s.status == GoStatus::Unknown));
    }

    #[test]
    fn summary_preserves_stable_operation_order() {
        let summary = summarize_operations(None, &Thresholds::defaults());
        let keys: Vec<OperationType> = summary.iter().map(|s| s.key).collect();
        assert_eq!(keys, OperationType::ALL.to_vec());
    }

    #[test]
    fn proximity_bands_for_upper_bounds() {
        assert_eq!(proximity_band(Some(10.0), 20.0, BoundKind::Upper), ThresholdBand::Safe);
        assert_eq!(proximity_band(Some(14.0), 20.0, BoundKind::Upper), ThresholdBand::Safe);
        assert_eq!(proximity_band(Some(15.0), 20.0, BoundKind::Upper), ThresholdBand::Caution);
        assert_eq!(proximity_band(Some(20.0), 20.0, BoundKind::Upper), ThresholdBand::Caution);
        assert_eq!(proximity_band(Some(20.5), 20.0, BoundKind::Upper), ThresholdBand::Exceeded);
        assert_eq!(proximity_band(None, 20.0, BoundKind::Upper), ThresholdBand::Unknown);
    }

    #[test]
    fn proximity_bands_for_lower_bounds() {
        assert_eq!(proximity_band(Some(5.0), 4.8, BoundKind::Lower), ThresholdBand::Safe);
        assert_eq!(proximity_band(Some(4.0), 4.8, BoundKind::Lower), ThresholdBand::Caution);
        assert_eq!(proximity_band(Some(3.0), 4.8, BoundKind::Lower), ThresholdBand::Exceeded);
    }

    #[test]
    fn limit_bands_follow_the_configured_bounds() {
        // craneLift configures wind and wave only.
        let limits = LimitSet {
            max_wind_speed: Some(20.0),
            max_wave_height: Some(1.8),
            ..LimitSet::default()
        };

        let mut obs = hour();
        obs.wind_speed = Some(25.0); // ≈13.5 kt, well under 20 kt
        obs.wave_height = Some(1.7); // between 70% and 100% of 1.8 m
        obs.visibility = Some(500.0); // no bound configured: must not band

        let bands = bands_for(&obs, &limits);
        assert_eq!(bands.wind_speed, Some(ThresholdBand::Safe));
        assert_eq!(bands.wave_height, Some(ThresholdBand::Caution));
        assert_eq!(bands.wind_gusts, None);
        assert_eq!(bands.visibility, None);
    }

    #[test]
    fn limit_bands_convert_units_like_the_evaluator() {
        let limits = LimitSet {
            max_wind_speed: Some(20.0), // knots
            min_visibility: Some(4.8),  // km
            ..LimitSet::default()
        };

        let mut obs = hour();
        obs.wind_speed = Some(38.0); // km/h ≈ 20.5 kt: over the bound
        obs.visibility = Some(3000.0); // m → 3 km: under 80% of 4.8 km

        let bands = bands_for(&obs, &limits);
        assert_eq!(bands.wind_speed, Some(ThresholdBand::Exceeded));
        assert_eq!(bands.visibility, Some(ThresholdBand::Exceeded));
    }

    #[test]
    fn limit_bands_report_unknown_for_missing_data() {
        let limits = LimitSet {
            max_wave_height: Some(1.8),
            ..LimitSet::default()
        };
        let bands = bands_for(&hour(), &limits);
        assert_eq!(bands.wave_height, Some(ThresholdBand::Unknown));
    }
}
