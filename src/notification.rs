//! Native notification wrapper
//!
//! The toast side channel is an injected capability: view controllers take
//! `&dyn Notifier`, the app passes the tauri-plugin-notification
//! implementation, and tests pass a recording double.

use tauri::AppHandle;
use tauri_plugin_notification::NotificationExt;

/// Transient user notification capability.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Production notifier backed by the platform notification plugin.
pub struct TauriNotifier {
    app: AppHandle,
}

impl TauriNotifier {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl Notifier for TauriNotifier {
    fn notify(&self, title: &str, body: &str) {
        let result = self
            .app
            .notification()
            .builder()
            .title(title)
            .body(body)
            .show();
        if let Err(e) = result {
            log::warn!("Failed to send notification: {}", e);
        }
    }
}

/// Notify that a risk prediction is ready.
pub fn notify_prediction_ready(notifier: &dyn Notifier) {
    notifier.notify("Prediction ready", "Prediction generated successfully!");
}

/// Notify that a dashboard fetch failed. `context` names the view.
///
/// Long messages (the server's application errors arrive verbatim) are
/// truncated to 100 chars on a char boundary; a byte slice could split a
/// multi-byte char and panic.
pub fn notify_fetch_error(notifier: &dyn Notifier, context: &str, error: &str) {
    let title = format!("{} unavailable", context);
    let body = match error.char_indices().nth(100) {
        Some((end, _)) => format!("{}...", &error[..end]),
        None => error.to_string(),
    };
    notifier.notify(&title, &body);
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Mutex;

    use super::Notifier;

    /// Records every notification so tests can assert on the side channel.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn titles(&self) -> Vec<String> {
            self.calls
                .lock()
                .map(|calls| calls.iter().map(|(t, _)| t.clone()).collect())
                .unwrap_or_default()
        }

        pub fn bodies(&self) -> Vec<String> {
            self.calls
                .lock()
                .map(|calls| calls.iter().map(|(_, b)| b.clone()).collect())
                .unwrap_or_default()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((title.to_string(), body.to_string()));
            }
        }
    }
}
