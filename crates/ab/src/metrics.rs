use chrono::{DateTime, Utc};
use serde::Serialize;
use simroute_vector::ModelVersion;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Aggregate latency statistics for one version
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl LatencySummary {
    fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sum: f64 = samples.iter().sum();
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: samples.len(),
            mean: sum / samples.len() as f64,
            min,
            max,
        })
    }
}

/// Append-only per-version latency log (seconds)
pub struct MetricsLog {
    samples: RwLock<HashMap<ModelVersion, Vec<f64>>>,
    started_at: DateTime<Utc>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(HashMap::new()),
            started_at: Utc::now(),
        }
    }

    pub async fn append(&self, version: ModelVersion, latency: f64) {
        self.samples
            .write()
            .await
            .entry(version)
            .or_default()
            .push(latency);
    }

    pub async fn count(&self, version: ModelVersion) -> usize {
        self.samples
            .read()
            .await
            .get(&version)
            .map_or(0, Vec::len)
    }

    pub async fn summary(&self, version: ModelVersion) -> Option<LatencySummary> {
        let samples = self.samples.read().await;
        samples
            .get(&version)
            .and_then(|s| LatencySummary::from_samples(s))
    }

    /// Summaries for every version with at least one observation
    pub async fn summaries(&self) -> BTreeMap<ModelVersion, LatencySummary> {
        let samples = self.samples.read().await;
        samples
            .iter()
            .filter_map(|(version, s)| LatencySummary::from_samples(s).map(|sum| (*version, sum)))
            .collect()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for MetricsLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_summary() {
        let log = MetricsLog::new();
        log.append(ModelVersion::V1, 0.3).await;
        log.append(ModelVersion::V1, 0.1).await;
        log.append(ModelVersion::V1, 0.2).await;

        let summary = log.summary(ModelVersion::V1).await.unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 0.2).abs() < 1e-12);
        assert_eq!(summary.min, 0.1);
        assert_eq!(summary.max, 0.3);
    }

    #[tokio::test]
    async fn test_unobserved_version_has_no_summary() {
        let log = MetricsLog::new();
        log.append(ModelVersion::V2, 0.5).await;

        assert!(log.summary(ModelVersion::V1).await.is_none());
        assert_eq!(log.count(ModelVersion::V1).await, 0);

        let all = log.summaries().await;
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![ModelVersion::V2]);
    }
}
