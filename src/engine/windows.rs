//! Window segmentation: maximal contiguous safe runs over a forecast series

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::types::{HourlyObservation, OperationType, Thresholds, WeatherWindow, WindowHour};

use super::is_within_limits;

/// Window accumulator while the scan is inside a safe run.
struct OpenWindow {
    start_time: DateTime<Utc>,
    start_index: usize,
    conditions: Vec<WindowHour>,
}

impl OpenWindow {
    fn open(hour: &HourlyObservation, index: usize) -> Self {
        Self {
            start_time: hour.time,
            start_index: index,
            conditions: Vec::new(),
        }
    }

    /// Seal the accumulator. `conditions` holds exactly the safe hours of
    /// the run, so the end timestamp and duration fall out of it. That
    /// holds in both close paths: an unsafe hour is never appended, and at
    /// the forecast horizon the last series element is the last safe hour.
    fn close(self) -> WeatherWindow {
        let end_time = self.conditions.last().map_or(self.start_time, |c| c.time);
        WeatherWindow {
            start_time: self.start_time,
            end_time,
            start_index: self.start_index,
            duration_hours: self.conditions.len(),
            conditions: self.conditions,
        }
    }
}

/// Partition a forecast series into the ordered list of maximal contiguous
/// runs of hours that are within the operation's limits.
///
/// Single left-to-right scan with at most one open accumulator. A safe hour
/// opens (or extends) the current window; an unsafe hour closes it at the
/// previous hour — the unsafe hour itself is excluded from the window's
/// `conditions` and duration. Reaching the end of the series while a window
/// is open closes it at the last series element (a forecast-horizon
/// boundary, not a conditions change).
///
/// An empty series, or a registry with no limit set for `op`, yields an
/// empty list — never an error. Windows are emitted in scan order and are
/// not merged or duration-filtered; in particular `min_window_hours` is a
/// planning hint for display layers and does not suppress short windows
/// here.
pub fn compute_windows(
    series: &[HourlyObservation],
    thresholds: &Thresholds,
    op: OperationType,
) -> Vec<WeatherWindow> {
    let Some(limits) = thresholds.limits_for(op) else {
        return Vec::new();
    };

    let mut windows = Vec::new();
    let mut open: Option<OpenWindow> = None;

    for (index, hour) in series.iter().enumerate() {
        if is_within_limits(hour, limits) {
            open.get_or_insert_with(|| OpenWindow::open(hour, index))
                .conditions
                .push(WindowHour::from(hour));
        } else if let Some(window) = open.take() {
            windows.push(window.close());
        }
    }

    if let Some(window) = open.take() {
        windows.push(window.close());
    }

    windows
}

/// Compute windows for all six operations over one series, fanning the
/// per-operation scans across threads. Results keep the stable
/// [`OperationType::ALL`] order.
///
/// [`compute_windows`] itself is pure and synchronous; this helper is the
/// caller-side parallelism the engine's statelessness allows.
pub fn windows_for_all_operations(
    series: &[HourlyObservation],
    thresholds: &Thresholds,
) -> Vec<(OperationType, Vec<WeatherWindow>)> {
    OperationType::ALL
        .par_iter()
        .map(|&op| (op, compute_windows(series, thresholds, op)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LimitSet;
    use chrono::{Duration, TimeZone, Utc};

    /// Series where hour `i` has wave height `waves[i]` (m), everything else
    /// empty. Hourly spacing from a fixed UTC start.
    fn wave_series(waves: &[Option<f64>]) -> Vec<HourlyObservation> {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        waves
            .iter()
            .enumerate()
            .map(|(i, &wave)| {
                let mut obs = HourlyObservation::empty(start + Duration::hours(i as i64));
                obs.wave_height = wave;
                obs
            })
            .collect()
    }

    /// Registry with a single wave-height bound on rigMove.
    fn wave_registry(max_wave: f64) -> Thresholds {
        Thresholds {
            rig_move: Some(LimitSet {
                max_wave_height: Some(max_wave),
                min_window_hours: Some(12),
                ..LimitSet::default()
            }),
            ..Thresholds::default()
        }
    }

    const OP: OperationType = OperationType::RigMove;

    #[test]
    fn empty_series_yields_no_windows() {
        let windows = compute_windows(&[], &wave_registry(2.0), OP);
        assert!(windows.is_empty());
    }

    #[test]
    fn unconfigured_operation_yields_no_windows() {
        let series = wave_series(&[Some(1.0); 5]);
        let windows = compute_windows(&series, &Thresholds::default(), OP);
        assert!(windows.is_empty());
    }

    #[test]
    fn all_safe_series_is_one_window_spanning_everything() {
        let series = wave_series(&[Some(1.0); 24]);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start_index, 0);
        assert_eq!(w.duration_hours, 24);
        assert_eq!(w.start_time, series[0].time);
        assert_eq!(w.end_time, series[23].time);
        assert_eq!(w.conditions.len(), 24);
    }

    #[test]
    fn all_unsafe_series_yields_no_windows() {
        let series = wave_series(&[Some(3.0); 24]);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);
        assert!(windows.is_empty());
    }

    #[test]
    fn forty_eight_hour_two_window_scenario() {
        // Hours 0-11 safe, 12-14 unsafe, 15-47 safe.
        let mut waves = vec![Some(1.0); 48];
        for slot in waves.iter_mut().take(15).skip(12) {
            *slot = Some(3.5);
        }
        let series = wave_series(&waves);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        assert_eq!(windows.len(), 2, "expected exactly two windows");

        assert_eq!(windows[0].start_index, 0);
        assert_eq!(windows[0].duration_hours, 12);
        assert_eq!(windows[0].start_time, series[0].time);
        assert_eq!(windows[0].end_time, series[11].time);

        assert_eq!(windows[1].start_index, 15);
        assert_eq!(windows[1].duration_hours, 33);
        assert_eq!(windows[1].start_time, series[15].time);
        assert_eq!(windows[1].end_time, series[47].time);
    }

    #[test]
    fn closing_hour_is_excluded_from_conditions() {
        // Hours 0-2 safe, hour 3 unsafe, hour 4 safe.
        let series = wave_series(&[Some(1.0), Some(1.2), Some(1.4), Some(4.0), Some(1.0)]);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        assert_eq!(windows.len(), 2);

        let first = &windows[0];
        assert_eq!(first.conditions.len(), 3);
        assert_eq!(first.duration_hours, 3);
        assert_eq!(first.end_time, series[2].time);
        // The unsafe hour must not leak into the snapshot list.
        assert!(first.conditions.iter().all(|c| c.time != series[3].time));
        let times: Vec<_> = first.conditions.iter().map(|c| c.time).collect();
        assert_eq!(times, vec![series[0].time, series[1].time, series[2].time]);

        assert_eq!(windows[1].start_index, 4);
        assert_eq!(windows[1].duration_hours, 1);
    }

    #[test]
    fn single_safe_hour_window() {
        let series = wave_series(&[Some(1.0)]);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].duration_hours, 1);
        assert_eq!(windows[0].start_time, windows[0].end_time);
    }

    #[test]
    fn window_open_at_series_start_and_end() {
        // Safe run at the very start, one at the very end.
        let series = wave_series(&[Some(1.0), Some(1.0), Some(4.0), Some(4.0), Some(1.0)]);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start_index, 0);
        assert_eq!(windows[1].start_index, 4);
        assert_eq!(windows[1].end_time, series[4].time, "horizon close uses the last element");
    }

    #[test]
    fn missing_data_hours_count_as_safe() {
        // Hour 1 has no wave reading; the permissive policy keeps the run
        // contiguous.
        let series = wave_series(&[Some(1.0), None, Some(1.5)]);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].duration_hours, 3);
    }

    #[test]
    fn short_windows_survive_min_window_hours() {
        // One 3-hour run with rigMove's min_window_hours = 12: the engine
        // still emits it; filtering is a display concern.
        let mut waves = vec![Some(4.0); 10];
        waves[4] = Some(1.0);
        waves[5] = Some(1.0);
        waves[6] = Some(1.0);
        let series = wave_series(&waves);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].duration_hours, 3);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut waves = vec![Some(1.0); 30];
        waves[9] = Some(5.0);
        waves[19] = Some(5.0);
        let series = wave_series(&waves);
        let registry = wave_registry(2.0);

        let first = compute_windows(&series, &registry, OP);
        let second = compute_windows(&series, &registry, OP);
        assert_eq!(first, second);
    }

    #[test]
    fn duration_sum_never_exceeds_series_length() {
        let series = wave_series(&[Some(1.0), Some(4.0), Some(1.0), Some(1.0), Some(4.0)]);
        let windows = compute_windows(&series, &wave_registry(2.0), OP);

        let total: usize = windows.iter().map(|w| w.duration_hours).sum();
        assert!(total <= series.len());
        assert_eq!(total, 3);
    }

    #[test]
    fn all_operations_sweep_keeps_stable_order() {
        let series = wave_series(&[Some(1.0); 6]);
        let all = windows_for_all_operations(&series, &Thresholds::defaults());

        assert_eq!(all.len(), 6);
        let order: Vec<OperationType> = all.iter().map(|(op, _)| *op).collect();
        assert_eq!(order, OperationType::ALL.to_vec());
        // Every default operation should see the same calm series as one window.
        assert!(all.iter().all(|(_, windows)| windows.len() == 1));
    }
}
