//! HTTP gateway to the prediction/statistics service
//!
//! Single point of outbound calls. One method per endpoint; transport and
//! status handling are shared, and envelope normalization is kept in pure
//! `parse_*` functions so tests can drive them from canned JSON without a
//! socket. Field names on the wire (including the space-separated cluster
//! keys) are preserved exactly via serde renames.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ApiError;
use crate::helpers::classify_alert;
use crate::state::Config;
use crate::types::{
    ActiveClusters, Cluster, HighestCaseCluster, LocationInfo, PredictionResult, RiskLevel,
    SummaryStatistics, TimeSeriesPoint,
};

/// Client for the external prediction service.
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, String> {
        let base = Url::parse(&config.api_base_url)
            .map_err(|e| format!("Invalid apiBaseUrl {:?}: {}", config.api_base_url, e))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self { base, http })
    }

    /// Resolve a server-relative artifact path (e.g. "static/risk_map_560234.html")
    /// against the configured origin, for the embedded map frame.
    pub fn map_url(&self, map_file: &str) -> Option<String> {
        self.base.join(map_file).ok().map(|u| u.to_string())
    }

    /// POST `/predict` for one postal code.
    pub async fn predict(&self, postal_code: &str) -> Result<PredictionResult, ApiError> {
        let url = self.endpoint("predict")?;
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "postal_code": postal_code }))
            .send()
            .await?;
        let body = self.read_body(response).await?;
        let mut result = parse_prediction(&body, postal_code)?;
        result.map_url = result.map_file.as_deref().and_then(|f| self.map_url(f));
        Ok(result)
    }

    /// GET `/clusters/latest`.
    pub async fn latest_clusters(&self) -> Result<Vec<Cluster>, ApiError> {
        let body = self.get("clusters/latest").await?;
        parse_clusters(&body)
    }

    /// GET `/statistics/latest`.
    pub async fn latest_statistics(&self) -> Result<SummaryStatistics, ApiError> {
        let body = self.get("statistics/latest").await?;
        parse_statistics(&body)
    }

    /// GET `/statistics/incidence-rate`. Returns the latest year's points
    /// in chronological (Jan→Dec) order.
    pub async fn monthly_incidence_rate(&self) -> Result<Vec<TimeSeriesPoint>, ApiError> {
        let body = self.get("statistics/incidence-rate").await?;
        parse_incidence_rate(&body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn get(&self, path: &str) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await?;
        self.read_body(response).await
    }

    /// Shared HTTP-status handling: 404 is a distinct failure, any other
    /// non-2xx is surfaced as an application error, and a body that cannot
    /// be read counts as transport.
    async fn read_body(&self, response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::Application(format!(
                "Request failed: {}",
                status
                    .canonical_reason()
                    .unwrap_or_else(|| status.as_str())
            )));
        }
        response.text().await.map_err(ApiError::from)
    }
}

// ---------------------------------------------------------------------------
// Wire envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PredictEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    risk_level: Option<RiskLevel>,
    #[serde(default)]
    prediction_value: Option<f64>,
    #[serde(default)]
    street_address: Option<String>,
    #[serde(default)]
    map_file: Option<String>,
    #[serde(default)]
    location_info: LocationInfo,
}

#[derive(Debug, Deserialize)]
struct ClustersEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    clusters: Vec<WireCluster>,
}

#[derive(Debug, Deserialize)]
struct WireCluster {
    #[serde(rename = "Cluster Number", default)]
    cluster_number: i64,
    #[serde(rename = "Street Address", default)]
    street_address: String,
    #[serde(rename = "Number Of Cases", default)]
    number_of_cases: i64,
    #[serde(rename = "Recent Cases In Cluster", default)]
    recent_cases: i64,
    #[serde(rename = "Total Cases In Cluster", default)]
    total_cases: i64,
    #[serde(rename = "Latitude", default)]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StatisticsEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    total_cases: i64,
    #[serde(default)]
    average_incidence_rate: f64,
    #[serde(default)]
    active_clusters: i64,
    #[serde(default)]
    highest_case_cluster: Option<WireHighestCluster>,
}

#[derive(Debug, Deserialize)]
struct WireHighestCluster {
    #[serde(default)]
    cluster_number: Option<i64>,
    #[serde(default)]
    number_of_cases: i64,
    #[serde(default)]
    street_address: String,
}

#[derive(Debug, Deserialize)]
struct IncidenceEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    monthly_incidence_rate: Vec<WireMonthlyRate>,
}

#[derive(Debug, Deserialize)]
struct WireMonthlyRate {
    /// "YYYY-MM"
    #[serde(rename = "Month", default)]
    month: String,
    #[serde(rename = "Number Of Cases", default)]
    cases: i64,
    #[serde(rename = "Incidence Rate", default)]
    incidence_rate: f64,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn decode<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Reject envelopes the server flagged as failed, surfacing its message.
/// A body with no `status` at all is not a valid envelope and counts as
/// malformed, not as an application failure.
fn check_status(status: &str, message: Option<String>, fallback: &str) -> Result<(), ApiError> {
    if status == "success" {
        return Ok(());
    }
    if status.is_empty() {
        return Err(ApiError::Malformed(
            "response envelope missing status".to_string(),
        ));
    }
    Err(ApiError::Application(
        message.unwrap_or_else(|| fallback.to_string()),
    ))
}

pub fn parse_prediction(body: &str, postal_code: &str) -> Result<PredictionResult, ApiError> {
    let envelope: PredictEnvelope = decode(body)?;
    check_status(
        &envelope.status,
        envelope.message,
        "Failed to generate prediction.",
    )?;

    // "Unknown" street addresses are a server sentinel, not data.
    let street_address = envelope
        .street_address
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "Unknown");

    Ok(PredictionResult {
        postal_code: postal_code.to_string(),
        street_address,
        risk_level: envelope.risk_level.unwrap_or(RiskLevel::Unknown),
        prediction_value: envelope.prediction_value,
        location_info: envelope.location_info,
        map_file: envelope.map_file,
        map_url: None,
    })
}

pub fn parse_clusters(body: &str) -> Result<Vec<Cluster>, ApiError> {
    let envelope: ClustersEnvelope = decode(body)?;
    check_status(
        &envelope.status,
        envelope.message,
        "Failed to fetch latest clusters.",
    )?;

    Ok(envelope
        .clusters
        .into_iter()
        .map(|c| Cluster {
            id: c.cluster_number,
            street_address: if c.street_address.is_empty() {
                "Unknown".to_string()
            } else {
                c.street_address
            },
            active_cases: c.number_of_cases,
            new_cases: c.recent_cases,
            total_cases: c.total_cases,
            alert_level: classify_alert(c.number_of_cases),
            latitude: c.latitude,
            longitude: c.longitude,
        })
        .collect())
}

pub fn parse_statistics(body: &str) -> Result<SummaryStatistics, ApiError> {
    let envelope: StatisticsEnvelope = decode(body)?;
    check_status(
        &envelope.status,
        envelope.message,
        "Failed to fetch latest statistics.",
    )?;

    let highest = envelope.highest_case_cluster.unwrap_or(WireHighestCluster {
        cluster_number: None,
        number_of_cases: 0,
        street_address: String::new(),
    });

    Ok(SummaryStatistics {
        total_active_cases: envelope.total_cases,
        average_incidence_rate: envelope.average_incidence_rate,
        active_clusters: ActiveClusters {
            total: envelope.active_clusters,
        },
        highest_case_cluster: HighestCaseCluster {
            cluster_number: highest.cluster_number,
            number_of_cases: highest.number_of_cases,
            street_address: highest.street_address,
        },
        as_of: String::new(),
    })
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Split "YYYY-MM" into (year, month index 1..=12). Entries that do not
/// parse are dropped rather than failing the series.
fn split_month_key(key: &str) -> Option<(&str, usize)> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = month.parse().ok()?;
    if (1..=12).contains(&index) {
        Some((year, index))
    } else {
        None
    }
}

pub fn parse_incidence_rate(body: &str) -> Result<Vec<TimeSeriesPoint>, ApiError> {
    let envelope: IncidenceEnvelope = decode(body)?;
    check_status(
        &envelope.status,
        envelope.message,
        "Failed to fetch incidence rate data.",
    )?;

    let mut entries: Vec<(String, usize, i64, f64)> = Vec::new();
    for item in &envelope.monthly_incidence_rate {
        match split_month_key(&item.month) {
            Some((year, index)) => {
                entries.push((year.to_string(), index, item.cases, item.incidence_rate));
            }
            None => log::warn!("dropping incidence entry with bad month key {:?}", item.month),
        }
    }

    // Keep only the latest year present, then order Jan→Dec regardless of
    // input order.
    let latest_year = match entries.iter().map(|(year, ..)| year.clone()).max() {
        Some(year) => year,
        None => return Ok(Vec::new()),
    };
    entries.retain(|(year, ..)| *year == latest_year);
    entries.sort_by_key(|&(_, index, ..)| index);

    Ok(entries
        .into_iter()
        .map(|(year, index, cases, incidence_rate)| TimeSeriesPoint {
            month: MONTH_NAMES[index - 1].to_string(),
            year,
            cases,
            incidence_rate,
        })
        .collect())
}
