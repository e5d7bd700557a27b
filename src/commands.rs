use std::sync::Arc;

use tauri::{AppHandle, State};

use crate::fetch::FetchState;
use crate::notification::TauriNotifier;
use crate::state::{AppState, Config, Selection};
use crate::types::{ActiveView, Cluster, PredictionResult, SummaryStatistics, TimeSeriesPoint};
use crate::views;
use crate::views::trends::TrendAnalysis;

/// p95 latency budget for fetch commands. The budget is advisory: a slow
/// backend shows up in logs, not in the UI.
const FETCH_CMD_LATENCY_BUDGET_MS: u128 = 2_000;

fn log_latency(command: &str, started: std::time::Instant) {
    let elapsed_ms = started.elapsed().as_millis();
    if elapsed_ms > FETCH_CMD_LATENCY_BUDGET_MS {
        log::warn!(
            "{} exceeded latency budget: {}ms > {}ms",
            command,
            elapsed_ms,
            FETCH_CMD_LATENCY_BUDGET_MS
        );
    } else {
        log::debug!("{} completed in {}ms", command, elapsed_ms);
    }
}

/// Get current configuration
#[tauri::command]
pub fn get_config(state: State<Arc<AppState>>) -> Config {
    state.get_config()
}

/// Fetch summary statistics for the header cards.
#[tauri::command]
pub async fn get_summary(
    app: AppHandle,
    state: State<'_, Arc<AppState>>,
) -> Result<FetchState<SummaryStatistics>, String> {
    let started = std::time::Instant::now();
    let notifier = TauriNotifier::new(app);
    let result = views::summary::load(&state, &notifier).await;
    log_latency("get_summary", started);
    Ok(result)
}

/// Activate a dashboard view. Clears the cross-view district selection.
#[tauri::command]
pub fn activate_view(view: ActiveView, state: State<Arc<AppState>>) -> Selection {
    state.set_active_view(view)
}

/// Fetch clusters for the analysis view. Skips the network when rows are
/// already cached from a previous activation.
#[tauri::command]
pub async fn get_clusters(
    app: AppHandle,
    state: State<'_, Arc<AppState>>,
) -> Result<FetchState<Vec<Cluster>>, String> {
    let started = std::time::Instant::now();
    let notifier = TauriNotifier::new(app);
    let result = views::clusters::activate(&state, &notifier).await;
    log_latency("get_clusters", started);
    Ok(result)
}

/// Drop the cluster cache and reload from the service.
#[tauri::command]
pub async fn refresh_clusters(
    app: AppHandle,
    state: State<'_, Arc<AppState>>,
) -> Result<FetchState<Vec<Cluster>>, String> {
    let started = std::time::Instant::now();
    let notifier = TauriNotifier::new(app);
    let result = views::clusters::refresh(&state, &notifier).await;
    log_latency("refresh_clusters", started);
    Ok(result)
}

/// Fetch the monthly incidence series for the trends view.
#[tauri::command]
pub async fn get_trends(
    app: AppHandle,
    state: State<'_, Arc<AppState>>,
) -> Result<FetchState<Vec<TimeSeriesPoint>>, String> {
    let started = std::time::Instant::now();
    let notifier = TauriNotifier::new(app);
    let result = views::trends::activate(&state, &notifier).await;
    log_latency("get_trends", started);
    Ok(result)
}

/// Derived trend reading over whatever series the trends slot holds.
#[tauri::command]
pub fn get_trend_analysis(state: State<Arc<AppState>>) -> TrendAnalysis {
    match state.trends.snapshot().data {
        Some(series) => views::trends::analyze(&series),
        None => TrendAnalysis::InsufficientData,
    }
}

/// Submit a postal code for risk prediction.
#[tauri::command]
pub async fn submit_prediction(
    postal_code: String,
    app: AppHandle,
    state: State<'_, Arc<AppState>>,
) -> Result<FetchState<PredictionResult>, String> {
    let started = std::time::Instant::now();
    let notifier = TauriNotifier::new(app);
    let result = views::prediction::submit(&state, &notifier, &postal_code).await;
    log_latency("submit_prediction", started);
    Ok(result)
}

/// Toggle the highlighted district. Table rows, map markers, and GeoJSON
/// features all route through this one command so table and map stay
/// mutually consistent.
#[tauri::command]
pub fn toggle_district(district: String, state: State<Arc<AppState>>) -> Option<String> {
    state.toggle_district(&district)
}

/// Current shell selection state.
#[tauri::command]
pub fn get_selection(state: State<Arc<AppState>>) -> Selection {
    state.selection()
}
