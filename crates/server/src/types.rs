use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simroute_ab::{LatencySummary, TrafficSplit};
use simroute_vector::{ModelVersion, SimilarityResult, StoreInfo};
use std::collections::BTreeMap;

/// Find-similar request body
#[derive(Debug, Deserialize)]
pub struct FindSimilarRequest {
    /// Query embedding
    pub vector: Vec<f64>,

    /// Number of results (server default when omitted)
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Find-similar response
#[derive(Debug, Serialize)]
pub struct FindSimilarResponse {
    /// Version that served the request
    pub model_version: ModelVersion,

    /// Matches, highest similarity first
    pub results: Vec<SimilarityResult>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Detailed latency metrics
#[derive(Debug, Serialize)]
pub struct MetricsSummaryResponse {
    pub started_at: DateTime<Utc>,
    pub versions: BTreeMap<ModelVersion, LatencySummary>,
}

/// Loaded stores and the active traffic split
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub versions: BTreeMap<ModelVersion, StoreInfo>,
    pub split: TrafficSplit,
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: String,

    /// Human-readable details
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
