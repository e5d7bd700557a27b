//! Trends view: monthly incidence series plus derived trend analysis.

use serde::Serialize;

use crate::error::ApiError;
use crate::fetch::FetchState;
use crate::notification::{notify_fetch_error, Notifier};
use crate::state::AppState;
use crate::types::{TimeSeriesPoint, TrendDirection};

/// Derived reading of the displayed series. `InsufficientData` is reported
/// rather than computed when fewer than two points are available.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TrendAnalysis {
    InsufficientData,
    Computed {
        cases: TrendDirection,
        incidence_rate: TrendDirection,
        peak_cases: TimeSeriesPoint,
        peak_incidence: TimeSeriesPoint,
    },
}

/// Fire the incidence fetch for view activation. Unlike the cluster view,
/// trends refetch on every activation so the chart tracks the service.
pub async fn activate(state: &AppState, notifier: &dyn Notifier) -> FetchState<Vec<TimeSeriesPoint>> {
    let generation = state.trends.begin();
    let result = state.api.monthly_incidence_rate().await;
    apply(state, notifier, generation, result)
}

pub(crate) fn apply(
    state: &AppState,
    notifier: &dyn Notifier,
    generation: u64,
    result: Result<Vec<TimeSeriesPoint>, ApiError>,
) -> FetchState<Vec<TimeSeriesPoint>> {
    match result {
        Ok(series) => {
            // An empty series renders as a blank chart; fall back to the
            // bundled sample so the view stays legible.
            let series = if series.is_empty() {
                log::warn!("incidence endpoint returned no points; using sample series");
                sample_series()
            } else {
                series
            };
            if !state.trends.complete(generation, Ok(series)) {
                log::debug!("stale incidence response dropped");
            }
        }
        Err(err) => {
            log::warn!("incidence fetch failed: {}", err);
            let message = err.user_message();
            // Slot closes before the toast: the side channel must not
            // hold the request window open.
            state.trends.complete(generation, Err(message.clone()));
            notify_fetch_error(notifier, "Trend data", &message);
        }
    }
    state.trends.snapshot()
}

/// Classify the direction of each series by comparing the mean of the first
/// ceil(n/2) points against the mean of the rest, and report the peak point
/// of each (first occurrence wins ties).
pub fn analyze(series: &[TimeSeriesPoint]) -> TrendAnalysis {
    if series.len() < 2 {
        return TrendAnalysis::InsufficientData;
    }

    let split = (series.len() + 1) / 2;
    let cases: Vec<f64> = series.iter().map(|p| p.cases as f64).collect();
    let rates: Vec<f64> = series.iter().map(|p| p.incidence_rate).collect();

    TrendAnalysis::Computed {
        cases: direction(&cases[..split], &cases[split..]),
        incidence_rate: direction(&rates[..split], &rates[split..]),
        peak_cases: peak_by(series, |p| p.cases as f64),
        peak_incidence: peak_by(series, |p| p.incidence_rate),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn direction(first_half: &[f64], second_half: &[f64]) -> TrendDirection {
    let first = mean(first_half);
    let second = mean(second_half);
    if second > first {
        TrendDirection::Increasing
    } else if second < first {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

fn peak_by(series: &[TimeSeriesPoint], value: impl Fn(&TimeSeriesPoint) -> f64) -> TimeSeriesPoint {
    let mut best = &series[0];
    for point in &series[1..] {
        if value(point) > value(best) {
            best = point;
        }
    }
    best.clone()
}

/// Bundled fallback so the trends view is never blank.
fn sample_series() -> Vec<TimeSeriesPoint> {
    let months = [
        ("Jan", 570, 0.1),
        ("Feb", 430, 0.08),
        ("Mar", 380, 0.07),
        ("Apr", 420, 0.08),
        ("May", 490, 0.09),
    ];
    months
        .iter()
        .map(|&(month, cases, incidence_rate)| TimeSeriesPoint {
            month: month.to_string(),
            year: "2025".to_string(),
            cases,
            incidence_rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchStatus;
    use crate::notification::test_support::RecordingNotifier;

    fn point(month: &str, cases: i64, rate: f64) -> TimeSeriesPoint {
        TimeSeriesPoint {
            month: month.to_string(),
            year: "2025".to_string(),
            cases,
            incidence_rate: rate,
        }
    }

    fn series(cases: &[i64]) -> Vec<TimeSeriesPoint> {
        cases
            .iter()
            .enumerate()
            .map(|(i, &n)| point(&format!("M{}", i + 1), n, n as f64 / 100.0))
            .collect()
    }

    #[test]
    fn rising_series_classifies_increasing() {
        // first-half mean 15, second-half mean 35
        let analysis = analyze(&series(&[10, 20, 30, 40]));
        match analysis {
            TrendAnalysis::Computed { cases, peak_cases, .. } => {
                assert_eq!(cases, TrendDirection::Increasing);
                assert_eq!(peak_cases.cases, 40);
            }
            _ => panic!("expected computed analysis"),
        }
    }

    #[test]
    fn flat_series_classifies_stable() {
        let analysis = analyze(&series(&[10, 10, 10, 10]));
        match analysis {
            TrendAnalysis::Computed { cases, incidence_rate, .. } => {
                assert_eq!(cases, TrendDirection::Stable);
                assert_eq!(incidence_rate, TrendDirection::Stable);
            }
            _ => panic!("expected computed analysis"),
        }
    }

    #[test]
    fn falling_series_classifies_decreasing() {
        let analysis = analyze(&series(&[50, 40, 20, 10]));
        match analysis {
            TrendAnalysis::Computed { cases, .. } => {
                assert_eq!(cases, TrendDirection::Decreasing);
            }
            _ => panic!("expected computed analysis"),
        }
    }

    #[test]
    fn odd_length_puts_middle_point_in_first_half() {
        // split = ceil(5/2) = 3: [10,10,40] vs [40,40] → 20 vs 40, increasing
        let analysis = analyze(&series(&[10, 10, 40, 40, 40]));
        match analysis {
            TrendAnalysis::Computed { cases, .. } => {
                assert_eq!(cases, TrendDirection::Increasing);
            }
            _ => panic!("expected computed analysis"),
        }
    }

    #[test]
    fn single_point_reports_insufficient_data() {
        assert!(matches!(
            analyze(&series(&[42])),
            TrendAnalysis::InsufficientData
        ));
        assert!(matches!(analyze(&[]), TrendAnalysis::InsufficientData));
    }

    #[test]
    fn peak_tie_first_occurrence_wins() {
        let data = vec![point("Jan", 30, 0.1), point("Feb", 30, 0.2), point("Mar", 10, 0.2)];
        match analyze(&data) {
            TrendAnalysis::Computed { peak_cases, peak_incidence, .. } => {
                assert_eq!(peak_cases.month, "Jan");
                assert_eq!(peak_incidence.month, "Feb");
            }
            _ => panic!("expected computed analysis"),
        }
    }

    #[test]
    fn independent_directions_per_series() {
        // Cases rise while the rate falls.
        let data = vec![point("Jan", 10, 0.9), point("Feb", 20, 0.1)];
        match analyze(&data) {
            TrendAnalysis::Computed { cases, incidence_rate, .. } => {
                assert_eq!(cases, TrendDirection::Increasing);
                assert_eq!(incidence_rate, TrendDirection::Decreasing);
            }
            _ => panic!("expected computed analysis"),
        }
    }

    #[test]
    fn empty_fetch_falls_back_to_sample() {
        let state = AppState::for_tests();
        let recorder = RecordingNotifier::default();
        let generation = state.trends.begin();
        let result = apply(&state, &recorder, generation, Ok(Vec::new()));
        assert_eq!(result.status, FetchStatus::Success);
        let data = result.data.unwrap();
        assert_eq!(data.len(), 5);
        assert_eq!(data[0].month, "Jan");
        assert!(recorder.titles().is_empty());
    }

    #[test]
    fn failure_surfaces_both_ways() {
        let state = AppState::for_tests();
        let recorder = RecordingNotifier::default();
        let generation = state.trends.begin();
        let result = apply(
            &state,
            &recorder,
            generation,
            Err(ApiError::Transport("timed out".to_string())),
        );
        assert_eq!(result.status, FetchStatus::Error);
        assert_eq!(recorder.titles(), vec!["Trend data unavailable"]);
    }
}
