use chrono::{DateTime, Utc};
use rand::Rng;
use simroute_vector::ModelVersion;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::metrics::{LatencySummary, MetricsLog};
use crate::split::TrafficSplit;

/// A/B traffic router with per-version latency tracking
pub struct TrafficRouter {
    split: TrafficSplit,
    metrics: MetricsLog,
}

impl TrafficRouter {
    pub fn new(split: TrafficSplit) -> Self {
        Self {
            split,
            metrics: MetricsLog::new(),
        }
    }

    pub fn split(&self) -> &TrafficSplit {
        &self.split
    }

    /// Pick the version that serves the next request
    pub fn choose_version(&self) -> ModelVersion {
        self.choose_version_with(&mut rand::thread_rng())
    }

    /// Same as [`choose_version`](Self::choose_version) with a caller-supplied RNG
    pub fn choose_version_with<R: Rng>(&self, rng: &mut R) -> ModelVersion {
        let r: f64 = rng.gen();
        let version = self.split.pick(r);
        debug!("Routed request to {} (r={:.4})", version, r);
        version
    }

    /// Record how long `version` took to serve a request, in seconds
    pub async fn log_performance(&self, version: ModelVersion, latency: f64) {
        if !latency.is_finite() {
            warn!("Ignoring non-finite latency for {}: {}", version, latency);
            return;
        }
        if latency < 0.0 {
            warn!("Clamping negative latency for {}: {}", version, latency);
        }

        self.metrics.append(version, latency.max(0.0)).await;
        debug!("Logged {} latency: {:.6}s", version, latency);
    }

    /// Mean latency per version; versions with no observations are omitted
    pub async fn get_metrics(&self) -> BTreeMap<ModelVersion, f64> {
        self.metrics
            .summaries()
            .await
            .into_iter()
            .map(|(version, summary)| (version, summary.mean))
            .collect()
    }

    /// Mean latency of one version, `None` until it has been observed
    pub async fn mean_latency(&self, version: ModelVersion) -> Option<f64> {
        self.metrics.summary(version).await.map(|s| s.mean)
    }

    pub async fn observation_count(&self, version: ModelVersion) -> usize {
        self.metrics.count(version).await
    }

    pub async fn summary(&self) -> BTreeMap<ModelVersion, LatencySummary> {
        self.metrics.summaries().await
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.metrics.started_at()
    }
}

impl Default for TrafficRouter {
    fn default() -> Self {
        Self::new(TrafficSplit::default())
    }
}
