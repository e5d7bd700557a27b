pub mod api;
mod commands;
pub mod error;
pub mod fetch;
pub mod helpers;
mod notification;
pub mod state;
pub mod types;
pub mod views;

use std::sync::Arc;

use state::AppState;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .setup(|app| {
            let state = Arc::new(AppState::new().map_err(std::io::Error::other)?);
            app.manage(state.clone());

            // Kick off the summary fetch so the header cards are populated
            // on first paint rather than waiting for the shell to ask.
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let notifier = notification::TauriNotifier::new(handle);
                views::summary::load(&state, &notifier).await;
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_config,
            commands::get_summary,
            commands::activate_view,
            commands::get_clusters,
            commands::refresh_clusters,
            commands::get_trends,
            commands::get_trend_analysis,
            commands::submit_prediction,
            commands::toggle_district,
            commands::get_selection,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
