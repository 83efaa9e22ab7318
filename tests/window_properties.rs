//! Window Segmentation Properties
//!
//! Property-based checks over arbitrary forecast series: ordering,
//! disjointness, duration accounting, and agreement with the per-hour
//! verdict must hold for any input, not just curated scenarios.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use offshorewatch::engine::{compute_windows, is_within_limits};
use offshorewatch::types::{HourlyObservation, LimitSet, OperationType, Thresholds};

const OP: OperationType = OperationType::CraneLift;

/// Series with one observation per hour carrying the given wind (km/h) and
/// wave (m) readings; `None` readings model feed gaps.
fn series_from(hours: &[(Option<f64>, Option<f64>)]) -> Vec<HourlyObservation> {
    let start = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
    hours
        .iter()
        .enumerate()
        .map(|(i, &(wind, wave))| {
            let mut obs = HourlyObservation::empty(start + Duration::hours(i as i64));
            obs.wind_speed = wind;
            obs.wave_height = wave;
            obs
        })
        .collect()
}

/// Registry bounding craneLift by wind and wave, nothing else configured.
fn registry(max_wind_kt: f64, max_wave_m: f64) -> Thresholds {
    Thresholds {
        crane_lift: Some(LimitSet {
            max_wind_speed: Some(max_wind_kt),
            max_wave_height: Some(max_wave_m),
            ..LimitSet::default()
        }),
        ..Thresholds::default()
    }
}

/// Arbitrary forecast hours: winds up to storm force, waves up to 5 m,
/// with a realistic share of missing readings.
fn hours_strategy() -> impl Strategy<Value = Vec<(Option<f64>, Option<f64>)>> {
    prop::collection::vec(
        (
            prop::option::weighted(0.85, 0.0..80.0f64),
            prop::option::weighted(0.85, 0.0..5.0f64),
        ),
        0..160,
    )
}

proptest! {
    /// Windows come out in scan order with at least one unsafe hour
    /// between consecutive windows.
    #[test]
    fn prop_windows_are_ordered_and_disjoint(hours in hours_strategy()) {
        let series = series_from(&hours);
        let windows = compute_windows(&series, &registry(20.0, 1.8), OP);

        for pair in windows.windows(2) {
            let gap_start = pair[0].start_index + pair[0].duration_hours;
            prop_assert!(
                gap_start < pair[1].start_index,
                "windows must be separated by at least one unsafe hour"
            );
            prop_assert!(pair[0].end_time < pair[1].start_time);
        }
    }

    /// The window count equals the number of maximal contiguous safe runs.
    #[test]
    fn prop_window_count_equals_safe_run_count(hours in hours_strategy()) {
        let series = series_from(&hours);
        let thresholds = registry(20.0, 1.8);
        let limits = thresholds.limits_for(OP).unwrap();

        let mut runs = 0usize;
        let mut in_run = false;
        for hour in &series {
            let safe = is_within_limits(hour, limits);
            if safe && !in_run {
                runs += 1;
            }
            in_run = safe;
        }

        let windows = compute_windows(&series, &thresholds, OP);
        prop_assert_eq!(windows.len(), runs);
    }

    /// Every safe hour lands in exactly one window: durations sum to the
    /// safe-hour count, which never exceeds the series length.
    #[test]
    fn prop_durations_sum_to_safe_hours(hours in hours_strategy()) {
        let series = series_from(&hours);
        let thresholds = registry(20.0, 1.8);
        let limits = thresholds.limits_for(OP).unwrap();

        let safe_hours = series.iter().filter(|h| is_within_limits(h, limits)).count();
        let windows = compute_windows(&series, &thresholds, OP);
        let total: usize = windows.iter().map(|w| w.duration_hours).sum();

        prop_assert_eq!(total, safe_hours);
        prop_assert!(total <= series.len());
    }

    /// A window's condition snapshots are its duration: one per safe hour,
    /// bracketed by start_time and end_time.
    #[test]
    fn prop_conditions_bracket_the_window(hours in hours_strategy()) {
        let series = series_from(&hours);
        let windows = compute_windows(&series, &registry(20.0, 1.8), OP);

        for w in &windows {
            prop_assert_eq!(w.conditions.len(), w.duration_hours);
            prop_assert!(w.duration_hours >= 1, "a window only opens on a safe hour");
            prop_assert_eq!(w.conditions[0].time, w.start_time);
            prop_assert_eq!(w.conditions[w.conditions.len() - 1].time, w.end_time);
        }
    }

    /// Window membership agrees with the per-hour verdict everywhere.
    #[test]
    fn prop_membership_matches_verdict(hours in hours_strategy()) {
        let series = series_from(&hours);
        let thresholds = registry(20.0, 1.8);
        let limits = thresholds.limits_for(OP).unwrap();
        let windows = compute_windows(&series, &thresholds, OP);

        let mut covered = vec![false; series.len()];
        for w in &windows {
            for slot in covered.iter_mut().skip(w.start_index).take(w.duration_hours) {
                *slot = true;
            }
        }

        for (i, hour) in series.iter().enumerate() {
            prop_assert_eq!(is_within_limits(hour, limits), covered[i]);
        }
    }

    /// min_window_hours is a planning hint: it never changes the output.
    #[test]
    fn prop_min_window_hours_never_filters(hours in hours_strategy()) {
        let series = series_from(&hours);

        let plain = registry(20.0, 1.8);
        let mut hinted = registry(20.0, 1.8);
        if let Some(limits) = hinted.crane_lift.as_mut() {
            limits.min_window_hours = Some(1_000);
        }

        prop_assert_eq!(
            compute_windows(&series, &plain, OP),
            compute_windows(&series, &hinted, OP)
        );
    }

    /// A registry with nothing configured for the operation yields no
    /// windows for any series.
    #[test]
    fn prop_unconfigured_operation_yields_nothing(hours in hours_strategy()) {
        let series = series_from(&hours);
        let windows = compute_windows(&series, &Thresholds::default(), OP);
        prop_assert!(windows.is_empty());
    }
}
