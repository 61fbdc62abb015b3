use serde::Serialize;
use simroute_common::{Result, SimRouteError};
use simroute_vector::ModelVersion;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Validated, normalized traffic split between model versions
///
/// Weights always sum to 1. Versions are walked in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrafficSplit {
    weights: BTreeMap<ModelVersion, f64>,
}

impl TrafficSplit {
    /// Validate and normalize raw weights
    ///
    /// Weights must be finite and non-negative with a positive sum.
    pub fn new<I>(weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ModelVersion, f64)>,
    {
        let mut raw = BTreeMap::new();
        for (version, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SimRouteError::config(format!(
                    "weight for {} must be a non-negative number, got {}",
                    version, weight
                )));
            }
            if raw.insert(version, weight).is_some() {
                return Err(SimRouteError::config(format!(
                    "duplicate weight for {}",
                    version
                )));
            }
        }

        let total: f64 = raw.values().sum();
        if raw.is_empty() || total <= 0.0 {
            return Err(SimRouteError::config(
                "traffic split weights must sum to a positive value",
            ));
        }

        let weights = raw
            .into_iter()
            .map(|(version, weight)| (version, weight / total))
            .collect();

        Ok(Self { weights })
    }

    /// Normalized weight of `version` (0 when absent)
    pub fn weight(&self, version: ModelVersion) -> f64 {
        self.weights.get(&version).copied().unwrap_or(0.0)
    }

    pub fn weights(&self) -> &BTreeMap<ModelVersion, f64> {
        &self.weights
    }

    /// Versions that can receive traffic (positive weight)
    pub fn active_versions(&self) -> Vec<ModelVersion> {
        self.weights
            .iter()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(&version, _)| version)
            .collect()
    }

    /// Cumulative-distribution walk: first version whose running weight exceeds `r`
    ///
    /// `r` is expected in [0, 1). If rounding leaves `r` uncovered the last
    /// version with a positive weight is returned.
    pub fn pick(&self, r: f64) -> ModelVersion {
        let mut cumulative = 0.0;
        let mut last_positive = None;

        for (&version, &weight) in &self.weights {
            if weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = Some(version);
            if r < cumulative {
                return version;
            }
        }

        // at least one weight is positive, guaranteed by `new`
        last_positive.unwrap_or(ModelVersion::V1)
    }
}

impl Default for TrafficSplit {
    /// 70% v1, 30% v2
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([(ModelVersion::V1, 0.7), (ModelVersion::V2, 0.3)]),
        }
    }
}

impl FromStr for TrafficSplit {
    type Err = SimRouteError;

    /// Parse "v1=0.7,v2=0.3"
    fn from_str(s: &str) -> Result<Self> {
        let mut weights = Vec::new();

        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (version, weight) = pair.split_once('=').ok_or_else(|| {
                SimRouteError::config(format!("expected 'version=weight', got '{}'", pair))
            })?;

            let version: ModelVersion = version.parse()?;
            let weight: f64 = weight.trim().parse().map_err(|_| {
                SimRouteError::config(format!("invalid weight '{}' for {}", weight.trim(), version))
            })?;

            weights.push((version, weight));
        }

        Self::new(weights)
    }
}
