use serde::{Deserialize, Serialize};
use simroute_common::SimRouteError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Model version tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVersion {
    V1,
    V2,
}

impl ModelVersion {
    /// Every supported version, in routing order
    pub const ALL: [ModelVersion; 2] = [ModelVersion::V1, ModelVersion::V2];

    /// Version tag as used in file names and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVersion {
    type Err = SimRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(SimRouteError::invalid_version(other)),
        }
    }
}

/// A single nearest-neighbor match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Row index in the vector store
    pub index: usize,

    /// Cosine similarity, within [-1, 1]
    pub similarity: f64,
}

impl SimilarityResult {
    pub fn new(index: usize, similarity: f64) -> Self {
        Self { index, similarity }
    }
}

/// Where a vector store's matrix came from
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingSource {
    /// Loaded from a persisted embedding file
    File(PathBuf),

    /// Synthesized from a fixed seed
    Mock { seed: u64 },
}

impl EmbeddingSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Mock { .. } => "mock",
        }
    }
}

/// Store statistics exposed to operators
#[derive(Debug, Clone, Serialize)]
pub struct StoreInfo {
    /// Number of stored vectors (N)
    pub rows: usize,

    /// Embedding dimension (D)
    pub dim: usize,

    /// "file" or "mock"
    pub source: &'static str,

    /// Hex SHA-256 of the matrix contents
    pub fingerprint: String,
}
