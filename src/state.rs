use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::fetch::FetchSlot;
use crate::types::{
    ActiveView, Cluster, PredictionResult, SummaryStatistics, TimeSeriesPoint,
};

/// Configuration stored in ~/.denguewatch/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Cross-view selection state, owned by the shell.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub active_view: ActiveView,
    pub active_district: Option<String>,
}

/// Application state managed by Tauri. One fetch slot per dashboard view;
/// each slot is mutated only by its owning view controller.
pub struct AppState {
    pub config: Mutex<Config>,
    pub api: ApiClient,
    pub summary: FetchSlot<SummaryStatistics>,
    pub clusters: FetchSlot<Vec<Cluster>>,
    pub trends: FetchSlot<Vec<TimeSeriesPoint>>,
    pub prediction: FetchSlot<PredictionResult>,
    pub selection: Mutex<Selection>,
}

impl AppState {
    pub fn new() -> Result<Self, String> {
        let config = load_config();
        let api = ApiClient::new(&config)?;
        Ok(Self {
            config: Mutex::new(config),
            api,
            summary: FetchSlot::new(),
            clusters: FetchSlot::new(),
            trends: FetchSlot::new(),
            prediction: FetchSlot::new(),
            selection: Mutex::new(Selection::default()),
        })
    }

    pub fn get_config(&self) -> Config {
        self.config
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Switch the active view. Selection does not persist across views, so
    /// the active district is always cleared here.
    pub fn set_active_view(&self, view: ActiveView) -> Selection {
        match self.selection.lock() {
            Ok(mut guard) => {
                guard.active_view = view;
                guard.active_district = None;
                guard.clone()
            }
            Err(_) => Selection {
                active_view: view,
                active_district: None,
            },
        }
    }

    /// Shared selection toggle for table rows, map markers, and GeoJSON
    /// features: selecting the selected district clears it, selecting a
    /// different one replaces it.
    pub fn toggle_district(&self, district: &str) -> Option<String> {
        match self.selection.lock() {
            Ok(mut guard) => {
                if guard.active_district.as_deref() == Some(district) {
                    guard.active_district = None;
                } else {
                    guard.active_district = Some(district.to_string());
                }
                guard.active_district.clone()
            }
            Err(_) => None,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl AppState {
    /// Fresh state against the default origin, ignoring any on-disk config;
    /// tests never issue requests.
    pub fn for_tests() -> Self {
        let config = Config::default();
        let api = ApiClient::new(&config).expect("test client");
        Self {
            config: Mutex::new(config),
            api,
            summary: FetchSlot::new(),
            clusters: FetchSlot::new(),
            trends: FetchSlot::new(),
            prediction: FetchSlot::new(),
            selection: Mutex::new(Selection::default()),
        }
    }
}

/// Get the canonical config file path (~/.denguewatch/config.json)
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".denguewatch").join("config.json"))
}

/// Load configuration from disk. A missing or unreadable file yields the
/// defaults: the dashboard must start against the default origin without
/// any setup step.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        log::warn!("no home directory; using default configuration");
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("failed to parse {}: {}. Using defaults.", path.display(), e);
                Config::default()
            }
        },
        Err(e) => {
            log::warn!("failed to read {}: {}. Using defaults.", path.display(), e);
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selects_then_clears() {
        let state = AppState::for_tests();
        assert_eq!(state.toggle_district("Bedok North Road").as_deref(), Some("Bedok North Road"));
        assert_eq!(state.toggle_district("Bedok North Road"), None);
    }

    #[test]
    fn toggle_replaces_different_district() {
        let state = AppState::for_tests();
        state.toggle_district("A");
        assert_eq!(state.toggle_district("B").as_deref(), Some("B"));
    }

    #[test]
    fn switching_views_clears_selection() {
        let state = AppState::for_tests();
        state.toggle_district("A");
        let selection = state.set_active_view(ActiveView::Trends);
        assert_eq!(selection.active_view, ActiveView::Trends);
        assert_eq!(selection.active_district, None);
    }

    #[test]
    fn default_config_points_at_local_service() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn config_parses_partial_json() {
        let config: Config =
            serde_json::from_str("{\"apiBaseUrl\": \"http://10.0.0.5:9000\"}").unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
        assert_eq!(config.request_timeout_secs, 15);
    }
}
