use simroute_common::{Result, SimRouteError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::loader::EmbeddingLoader;
use crate::store::VectorStore;
use crate::types::{ModelVersion, SimilarityResult, StoreInfo};

/// Number of results returned when the caller does not ask for a count
pub const DEFAULT_TOP_K: usize = 10;

/// Exact nearest-neighbor search over one version's embeddings
#[derive(Debug)]
pub struct SimilarityEngine {
    store: VectorStore,
}

impl SimilarityEngine {
    /// Wrap an already materialized store
    pub fn new(store: VectorStore) -> Self {
        Self { store }
    }

    /// Create the engine for a version tag ("v1" or "v2")
    pub fn for_version(version: &str, loader: &dyn EmbeddingLoader) -> Result<Self> {
        let version: ModelVersion = version.parse()?;
        Ok(Self::new(loader.load(version)?))
    }

    pub fn version(&self) -> ModelVersion {
        self.store.version()
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Top-k most similar stored vectors, highest similarity first
    ///
    /// `top_k` defaults to [`DEFAULT_TOP_K`]; asking for more than the store
    /// holds returns every row.
    pub fn find_similar(
        &self,
        query: &[f64],
        top_k: Option<usize>,
    ) -> Result<Vec<SimilarityResult>> {
        let top_k = top_k.unwrap_or(DEFAULT_TOP_K);

        if query.len() != self.store.dim() {
            return Err(SimRouteError::dimension_mismatch(self.store.dim(), query.len()));
        }
        if top_k == 0 {
            return Err(SimRouteError::invalid_input("top_k must be greater than 0"));
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(SimRouteError::invalid_input("query vector contains non-finite values"));
        }

        let results = self.store.rank(query, top_k);

        debug!(
            "{} search completed - {} results from {} candidates",
            self.version(),
            results.len(),
            self.store.len()
        );
        Ok(results)
    }
}

/// One engine per model version, built once at startup
#[derive(Debug, Default)]
pub struct EngineRegistry {
    engines: BTreeMap<ModelVersion, Arc<SimilarityEngine>>,
}

impl EngineRegistry {
    /// Load every supported version
    pub fn load_all(loader: &dyn EmbeddingLoader) -> Result<Self> {
        Self::load(loader, &ModelVersion::ALL)
    }

    /// Load the given versions, failing on the first that cannot be loaded
    pub fn load(loader: &dyn EmbeddingLoader, versions: &[ModelVersion]) -> Result<Self> {
        let mut registry = Self::default();
        for &version in versions {
            registry.insert(SimilarityEngine::new(loader.load(version)?));
        }

        info!(
            "Engine registry initialized - versions: {:?}",
            registry.versions()
        );
        Ok(registry)
    }

    /// Add or replace the engine for its version
    pub fn insert(&mut self, engine: SimilarityEngine) {
        self.engines.insert(engine.version(), Arc::new(engine));
    }

    pub fn get(&self, version: ModelVersion) -> Result<Arc<SimilarityEngine>> {
        self.engines.get(&version).cloned().ok_or_else(|| {
            SimRouteError::embeddings_not_found(format!("no engine loaded for {}", version))
        })
    }

    pub fn versions(&self) -> Vec<ModelVersion> {
        self.engines.keys().copied().collect()
    }

    pub fn describe(&self) -> BTreeMap<ModelVersion, StoreInfo> {
        self.engines
            .iter()
            .map(|(version, engine)| (*version, engine.store().info()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DirectoryLoader, MockSettings};
    use crate::types::EmbeddingSource;
    use rand::{Rng, SeedableRng};

    fn mock_loader() -> (tempfile::TempDir, DirectoryLoader) {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirectoryLoader::new(dir.path()).with_mock_fallback(MockSettings::default());
        (dir, loader)
    }

    fn random_query(dim: usize, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..dim).map(|_| rng.gen::<f64>()).collect()
    }

    #[test]
    fn test_similarity_returns_top_k_results() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v1", &loader).unwrap();

        let results = engine.find_similar(&random_query(64, 5), Some(5)).unwrap();
        assert_eq!(results.len(), 5);
        for r in &results {
            assert!(r.index < 100);
            assert!((-1.0..=1.0).contains(&r.similarity));
        }
        // non-negative embeddings and query
        assert!((0.0..=1.0).contains(&results[0].similarity));
    }

    #[test]
    fn test_default_top_k() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v2", &loader).unwrap();

        let results = engine.find_similar(&vec![0.1; 64], None).unwrap();
        assert_eq!(results.len(), DEFAULT_TOP_K);
    }

    #[test]
    fn test_results_sorted_descending() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v1", &loader).unwrap();

        let results = engine.find_similar(&random_query(64, 11), Some(100)).unwrap();
        for pair in results.windows(2) {
            assert!(
                pair[0].similarity > pair[1].similarity
                    || (pair[0].similarity == pair[1].similarity && pair[0].index < pair[1].index)
            );
        }
    }

    #[test]
    fn test_top_k_larger_than_store_returns_all() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v1", &loader).unwrap();

        let results = engine.find_similar(&vec![0.1; 64], Some(1000)).unwrap();
        assert_eq!(results.len(), 100);
    }

    #[test]
    fn test_stored_vector_is_its_own_nearest_neighbor() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v1", &loader).unwrap();

        let row = engine.store().row(17).unwrap();
        let norm = row.dot(&row).sqrt();
        let query: Vec<f64> = row.iter().map(|x| x / norm).collect();

        let results = engine.find_similar(&query, Some(3)).unwrap();
        assert_eq!(results[0].index, 17);
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tie_break_by_index() {
        let rows = vec![vec![1.0, 1.0], vec![2.0, 0.0], vec![1.0, 1.0], vec![0.0, 2.0]];
        let store = VectorStore::from_rows(ModelVersion::V1, rows, EmbeddingSource::Mock { seed: 0 })
            .unwrap();
        let engine = SimilarityEngine::new(store);

        let results = engine.find_similar(&[1.0, 1.0], Some(4)).unwrap();
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_huge_finite_query_keeps_similarities_in_range() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v1", &loader).unwrap();
        let baseline = engine.find_similar(&vec![1.0; 64], Some(5)).unwrap();

        for magnitude in [1e200, 1e308, f64::MAX] {
            let results = engine.find_similar(&vec![magnitude; 64], Some(5)).unwrap();
            for r in &results {
                assert!(
                    (-1.0..=1.0).contains(&r.similarity),
                    "similarity out of range: {}",
                    r.similarity
                );
            }
            assert_eq!(results, baseline);
        }

        let tiny = engine.find_similar(&vec![1e-310; 64], Some(5)).unwrap();
        assert_eq!(tiny, baseline);
    }

    #[test]
    fn test_dimension_mismatch() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v1", &loader).unwrap();

        let err = engine.find_similar(&[0.1; 10], None).unwrap_err();
        assert!(matches!(
            err,
            SimRouteError::DimensionMismatch { expected: 64, actual: 10 }
        ));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let (_dir, loader) = mock_loader();
        let engine = SimilarityEngine::for_version("v1", &loader).unwrap();

        let err = engine.find_similar(&[0.1; 64], Some(0)).unwrap_err();
        assert!(matches!(err, SimRouteError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_version_raises_error() {
        let (_dir, loader) = mock_loader();
        let err = SimilarityEngine::for_version("v3", &loader).unwrap_err();
        assert!(matches!(err, SimRouteError::InvalidVersion(_)));
        assert!(err.to_string().to_lowercase().contains("version must be"));
    }

    #[test]
    fn test_mock_fallback_is_reproducible() {
        let (_dir, loader) = mock_loader();
        let a = SimilarityEngine::for_version("v2", &loader).unwrap();
        let b = SimilarityEngine::for_version("v2", &loader).unwrap();
        assert_eq!(a.store().fingerprint(), b.store().fingerprint());
    }

    #[test]
    fn test_registry_loads_all_versions() {
        let (_dir, loader) = mock_loader();
        let registry = EngineRegistry::load_all(&loader).unwrap();

        assert_eq!(registry.versions(), vec![ModelVersion::V1, ModelVersion::V2]);
        assert_eq!(registry.get(ModelVersion::V2).unwrap().version(), ModelVersion::V2);

        let info = registry.describe();
        assert_eq!(info[&ModelVersion::V1].rows, 100);
        assert_eq!(info[&ModelVersion::V1].source, "mock");
    }

    #[test]
    fn test_registry_missing_version() {
        let (_dir, loader) = mock_loader();
        let registry = EngineRegistry::load(&loader, &[ModelVersion::V1]).unwrap();

        let err = registry.get(ModelVersion::V2).unwrap_err();
        assert!(matches!(err, SimRouteError::EmbeddingsNotFound(_)));
    }
}
