//! Summary-cards view: aggregate statistics for the dashboard header.

use crate::error::ApiError;
use crate::fetch::FetchState;
use crate::helpers::data_timestamp;
use crate::notification::{notify_fetch_error, Notifier};
use crate::state::AppState;
use crate::types::SummaryStatistics;

/// Fetch `/statistics/latest` and apply it to the summary slot.
/// Fired on app activation; the snapshot is replaced wholesale.
pub async fn load(state: &AppState, notifier: &dyn Notifier) -> FetchState<SummaryStatistics> {
    let generation = state.summary.begin();
    let result = state.api.latest_statistics().await;
    apply(state, notifier, generation, result)
}

pub(crate) fn apply(
    state: &AppState,
    notifier: &dyn Notifier,
    generation: u64,
    result: Result<SummaryStatistics, ApiError>,
) -> FetchState<SummaryStatistics> {
    match result {
        Ok(mut stats) => {
            stats.as_of = data_timestamp();
            if !state.summary.complete(generation, Ok(stats)) {
                log::debug!("stale statistics response dropped");
            }
        }
        Err(err) => {
            log::warn!("statistics fetch failed: {}", err);
            let message = err.user_message();
            // Slot closes before the toast: the side channel must not
            // hold the request window open.
            state.summary.complete(generation, Err(message.clone()));
            notify_fetch_error(notifier, "Statistics", &message);
        }
    }
    state.summary.snapshot()
}
