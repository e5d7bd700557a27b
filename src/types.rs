use serde::{Deserialize, Serialize};

/// Which dashboard view is active. Serialized with the kebab-case ids the
/// shell's sidebar uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveView {
    ClusterPrediction,
    Clusters,
    Trends,
}

impl Default for ActiveView {
    fn default() -> Self {
        ActiveView::ClusterPrediction
    }
}

/// Qualitative classification of a cluster's active case count.
/// Derived client-side from the raw count; never taken from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    Warning,
    Moderate,
    Low,
}

/// Qualitative prediction output for a postal code.
///
/// `Unknown` absorbs any server value outside the known set so a new server
/// label degrades display instead of failing the whole prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

/// One geographic dengue cluster, rebuilt wholesale on each fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: i64,
    pub street_address: String,
    pub active_cases: i64,
    pub new_cases: i64,
    pub total_cases: i64,
    pub alert_level: AlertLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Location context returned alongside a prediction. Every field is
/// optional on the wire; missing values default rather than failing
/// the payload. Serialized camelCase for the shell; the snake_case
/// aliases accept the server's field names on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default, alias = "landuse_name")]
    pub landuse_name: String,
    #[serde(default, alias = "landuse_type")]
    pub landuse_type: String,
    #[serde(default, alias = "nearby_clusters")]
    pub nearby_clusters: i64,
    #[serde(default, alias = "total_cases")]
    pub total_cases: i64,
    #[serde(default, alias = "humidity_score")]
    pub humidity_score: f64,
    #[serde(default, alias = "rainfall_score")]
    pub rainfall_score: f64,
}

/// Risk prediction for one submitted postal code. Ephemeral: replaced on
/// each submission, owned by the prediction view only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    pub risk_level: RiskLevel,
    pub prediction_value: Option<f64>,
    pub location_info: LocationInfo,
    /// Server-relative path of the rendered risk map ("static/risk_map_*.html").
    pub map_file: Option<String>,
    /// Absolute URL for the embedded map frame, resolved against the
    /// configured base origin.
    pub map_url: Option<String>,
}

/// One month of the incidence time series. Chronological order is
/// significant for chart rendering and trend computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Short month name ("Jan".."Dec").
    pub month: String,
    pub year: String,
    pub cases: i64,
    pub incidence_rate: f64,
}

/// The cluster with the highest case count, shown on the summary cards.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighestCaseCluster {
    pub cluster_number: Option<i64>,
    pub number_of_cases: i64,
    pub street_address: String,
}

/// Aggregate counts for the summary cards. Replaced wholesale per fetch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub total_active_cases: i64,
    pub average_incidence_rate: f64,
    pub active_clusters: ActiveClusters,
    pub highest_case_cluster: HighestCaseCluster,
    /// Display timestamp of when this snapshot was fetched.
    pub as_of: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveClusters {
    pub total: i64,
}

/// Direction of a series over the displayed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_view_uses_kebab_ids() {
        assert_eq!(
            serde_json::to_string(&ActiveView::ClusterPrediction).unwrap(),
            "\"cluster-prediction\""
        );
        let view: ActiveView = serde_json::from_str("\"trends\"").unwrap();
        assert_eq!(view, ActiveView::Trends);
    }

    #[test]
    fn risk_level_unknown_absorbs_new_labels() {
        let level: RiskLevel = serde_json::from_str("\"Severe\"").unwrap();
        assert_eq!(level, RiskLevel::Unknown);
        let level: RiskLevel = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(level, RiskLevel::High);
    }

    #[test]
    fn location_info_defaults_missing_fields() {
        let info: LocationInfo = serde_json::from_str("{\"latitude\": 1.35}").unwrap();
        assert_eq!(info.latitude, 1.35);
        assert_eq!(info.landuse_type, "");
        assert_eq!(info.humidity_score, 0.0);
    }

    #[test]
    fn location_info_accepts_server_field_names() {
        let info: LocationInfo = serde_json::from_str(
            "{\"landuse_type\": \"RESIDENTIAL\", \"humidity_score\": 8.5}",
        )
        .unwrap();
        assert_eq!(info.landuse_type, "RESIDENTIAL");
        assert_eq!(info.humidity_score, 8.5);
    }
}
