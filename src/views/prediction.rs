//! Prediction view: per-postal-code risk lookup and the embedded risk map.

use crate::error::ApiError;
use crate::fetch::FetchState;
use crate::notification::{notify_fetch_error, notify_prediction_ready, Notifier};
use crate::state::AppState;
use crate::types::PredictionResult;

/// Submit one postal code for prediction. Each submission replaces the
/// previous result wholesale; the result is ephemeral per postal code.
pub async fn submit(
    state: &AppState,
    notifier: &dyn Notifier,
    postal_code: &str,
) -> FetchState<PredictionResult> {
    let postal_code = postal_code.trim();
    let generation = state.prediction.begin();

    if postal_code.is_empty() {
        let message = "Please enter a postal code.".to_string();
        state.prediction.complete(generation, Err(message.clone()));
        notify_fetch_error(notifier, "Prediction", &message);
        return state.prediction.snapshot();
    }

    let result = state.api.predict(postal_code).await;
    apply(state, notifier, generation, result)
}

pub(crate) fn apply(
    state: &AppState,
    notifier: &dyn Notifier,
    generation: u64,
    result: Result<PredictionResult, ApiError>,
) -> FetchState<PredictionResult> {
    match result {
        Ok(prediction) => {
            log::info!(
                "prediction for {}: {:?}",
                prediction.postal_code,
                prediction.risk_level
            );
            if state.prediction.complete(generation, Ok(prediction)) {
                // Prediction is the one view that also toasts on success.
                notify_prediction_ready(notifier);
            } else {
                log::debug!("stale prediction response dropped");
            }
        }
        Err(err) => {
            log::warn!("prediction failed: {}", err);
            let message = err.user_message();
            // Slot closes before the toast: the side channel must not
            // hold the request window open.
            state.prediction.complete(generation, Err(message.clone()));
            notify_fetch_error(notifier, "Prediction", &message);
        }
    }
    state.prediction.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchStatus;
    use crate::notification::test_support::RecordingNotifier;
    use crate::types::{LocationInfo, RiskLevel};

    fn prediction(postal_code: &str, risk_level: RiskLevel) -> PredictionResult {
        PredictionResult {
            postal_code: postal_code.to_string(),
            street_address: None,
            risk_level,
            prediction_value: Some(82.5),
            location_info: LocationInfo::default(),
            map_file: Some(format!("static/risk_map_{}.html", postal_code)),
            map_url: Some(format!(
                "http://localhost:8000/static/risk_map_{}.html",
                postal_code
            )),
        }
    }

    #[test]
    fn success_notifies_and_keeps_map_reference() {
        let state = AppState::for_tests();
        let recorder = RecordingNotifier::default();
        let generation = state.prediction.begin();
        let result = apply(
            &state,
            &recorder,
            generation,
            Ok(prediction("560234", RiskLevel::High)),
        );
        assert_eq!(result.status, FetchStatus::Success);
        let data = result.data.unwrap();
        assert_eq!(data.risk_level, RiskLevel::High);
        assert_eq!(
            data.map_url.as_deref(),
            Some("http://localhost:8000/static/risk_map_560234.html")
        );
        assert_eq!(recorder.titles(), vec!["Prediction ready"]);
    }

    #[test]
    fn not_found_uses_postal_message() {
        let state = AppState::for_tests();
        let recorder = RecordingNotifier::default();
        let generation = state.prediction.begin();
        let result = apply(&state, &recorder, generation, Err(ApiError::NotFound));
        assert_eq!(result.status, FetchStatus::Error);
        assert_eq!(
            result.error.as_deref(),
            Some("Postal code not found. Please try again.")
        );
        assert_eq!(recorder.titles(), vec!["Prediction unavailable"]);
    }

    #[tokio::test]
    async fn blank_postal_code_short_circuits() {
        let state = AppState::for_tests();
        let recorder = RecordingNotifier::default();
        let result = submit(&state, &recorder, "   ").await;
        assert_eq!(result.status, FetchStatus::Error);
        assert_eq!(result.error.as_deref(), Some("Please enter a postal code."));
    }

    #[test]
    fn resubmission_replaces_previous_result() {
        let state = AppState::for_tests();
        let recorder = RecordingNotifier::default();
        let first = state.prediction.begin();
        apply(&state, &recorder, first, Ok(prediction("560234", RiskLevel::High)));
        let second = state.prediction.begin();
        let result = apply(
            &state,
            &recorder,
            second,
            Ok(prediction("018956", RiskLevel::Low)),
        );
        let data = result.data.unwrap();
        assert_eq!(data.postal_code, "018956");
        assert_eq!(data.risk_level, RiskLevel::Low);
    }
}
