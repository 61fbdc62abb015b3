use simroute_common::{AppConfig, Result, SimRouteError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::store::{embeddings_file_name, VectorStore, DEFAULT_MOCK_SEED, MOCK_DIM, MOCK_ROWS};
use crate::types::ModelVersion;

/// Source of embedding matrices for model versions
pub trait EmbeddingLoader: Send + Sync {
    /// Materialize the vector store for `version`
    fn load(&self, version: ModelVersion) -> Result<VectorStore>;
}

/// Shape and seed of synthesized mock stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSettings {
    pub seed: u64,
    pub rows: usize,
    pub dim: usize,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_MOCK_SEED,
            rows: MOCK_ROWS,
            dim: MOCK_DIM,
        }
    }
}

/// Loads `mock_embeddings_{version}.json` from a directory
///
/// When a file is missing the loader fails with `EmbeddingsNotFound`,
/// unless mock fallback was enabled explicitly.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
    mock: Option<MockSettings>,
}

impl DirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            mock: None,
        }
    }

    /// Synthesize deterministic stores for versions without a file
    pub fn with_mock_fallback(mut self, settings: MockSettings) -> Self {
        self.mock = Some(settings);
        self
    }

    /// Loader configured from `EMBEDDINGS_DIR`, `ALLOW_MOCK_EMBEDDINGS` and `MOCK_SEED`
    pub fn from_config(config: &AppConfig) -> Self {
        let loader = Self::new(&config.embeddings_dir);
        if config.allow_mock_embeddings {
            loader.with_mock_fallback(MockSettings {
                seed: config.mock_seed,
                ..MockSettings::default()
            })
        } else {
            loader
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the persisted file for `version`
    pub fn path_for(&self, version: ModelVersion) -> PathBuf {
        self.dir.join(embeddings_file_name(version))
    }
}

impl EmbeddingLoader for DirectoryLoader {
    fn load(&self, version: ModelVersion) -> Result<VectorStore> {
        let path = self.path_for(version);

        if path.exists() {
            let store = VectorStore::load_json(version, &path)?;
            info!(
                "Loaded {} embeddings from {} ({}x{})",
                version,
                path.display(),
                store.len(),
                store.dim()
            );
            return Ok(store);
        }

        match self.mock {
            Some(settings) => {
                warn!(
                    "No embeddings at {}, serving MOCK data for {} (seed={})",
                    path.display(),
                    version,
                    settings.seed
                );
                VectorStore::mock(version, settings.seed, settings.rows, settings.dim)
            }
            None => Err(SimRouteError::embeddings_not_found(format!(
                "{} (set ALLOW_MOCK_EMBEDDINGS=true to synthesize mock data)",
                path.display()
            ))),
        }
    }
}
