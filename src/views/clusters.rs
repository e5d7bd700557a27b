//! Cluster-analysis view: the table and map of active dengue clusters.

use crate::error::ApiError;
use crate::fetch::FetchState;
use crate::notification::{notify_fetch_error, Notifier};
use crate::state::AppState;
use crate::types::Cluster;

/// Fire the cluster fetch for view activation. Re-activating a view that
/// already has data must not refetch; the cached rows are returned as-is.
pub async fn activate(state: &AppState, notifier: &dyn Notifier) -> FetchState<Vec<Cluster>> {
    if state.clusters.has_data() {
        return state.clusters.snapshot();
    }
    load(state, notifier).await
}

/// Explicit refetch: drops the cache and reloads.
pub async fn refresh(state: &AppState, notifier: &dyn Notifier) -> FetchState<Vec<Cluster>> {
    state.clusters.reset();
    load(state, notifier).await
}

async fn load(state: &AppState, notifier: &dyn Notifier) -> FetchState<Vec<Cluster>> {
    let generation = state.clusters.begin();
    let result = state.api.latest_clusters().await;
    apply(state, notifier, generation, result)
}

pub(crate) fn apply(
    state: &AppState,
    notifier: &dyn Notifier,
    generation: u64,
    result: Result<Vec<Cluster>, ApiError>,
) -> FetchState<Vec<Cluster>> {
    match result {
        Ok(clusters) => {
            log::debug!("loaded {} clusters", clusters.len());
            if !state.clusters.complete(generation, Ok(clusters)) {
                log::debug!("stale cluster response dropped");
            }
        }
        Err(err) => {
            log::warn!("cluster fetch failed: {}", err);
            let message = err.user_message();
            // Slot closes before the toast: the side channel must not
            // hold the request window open.
            state.clusters.complete(generation, Err(message.clone()));
            notify_fetch_error(notifier, "Cluster data", &message);
        }
    }
    state.clusters.snapshot()
}
