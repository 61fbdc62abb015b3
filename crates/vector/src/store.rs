use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use simroute_common::{Result, SimRouteError};
use std::path::Path;
use tracing::debug;

use crate::similarity::{normalize, rank_top_k, unit_cosine};
use crate::types::{EmbeddingSource, ModelVersion, SimilarityResult, StoreInfo};

/// Rows in a synthesized mock store
pub const MOCK_ROWS: usize = 100;

/// Dimension of a synthesized mock store
pub const MOCK_DIM: usize = 64;

/// Seed used for mock stores unless configured otherwise
pub const DEFAULT_MOCK_SEED: u64 = 42;

/// File name of the persisted embeddings for a version
pub fn embeddings_file_name(version: ModelVersion) -> String {
    format!("mock_embeddings_{}.json", version)
}

/// Immutable N x D embedding matrix for one model version
#[derive(Debug, Clone)]
pub struct VectorStore {
    version: ModelVersion,
    matrix: Array2<f64>,
    /// Rows scaled to unit length, zero rows left as zero
    unit: Array2<f64>,
    source: EmbeddingSource,
}

impl VectorStore {
    /// Build a store from a row-major matrix
    pub fn from_matrix(
        version: ModelVersion,
        matrix: Array2<f64>,
        source: EmbeddingSource,
    ) -> Result<Self> {
        let (rows, dim) = matrix.dim();
        if rows == 0 || dim == 0 {
            return Err(SimRouteError::invalid_embeddings(format!(
                "{} embeddings must have at least one row and one column (got {}x{})",
                version, rows, dim
            )));
        }
        if matrix.iter().any(|x| !x.is_finite()) {
            return Err(SimRouteError::invalid_embeddings(format!(
                "{} embeddings contain non-finite values",
                version
            )));
        }

        let mut unit = matrix.clone();
        for row in unit.outer_iter_mut() {
            normalize(row);
        }

        Ok(Self {
            version,
            matrix,
            unit,
            source,
        })
    }

    /// Build a store from nested rows, checking they share one dimension
    pub fn from_rows(
        version: ModelVersion,
        rows: Vec<Vec<f64>>,
        source: EmbeddingSource,
    ) -> Result<Self> {
        let n = rows.len();
        let dim = rows.first().map(Vec::len).unwrap_or(0);

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(SimRouteError::invalid_embeddings(format!(
                "{} row {} has {} values, expected {}",
                version,
                i,
                row.len(),
                dim
            )));
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let matrix = Array2::from_shape_vec((n, dim), flat)
            .map_err(|e| SimRouteError::invalid_embeddings(e.to_string()))?;

        Self::from_matrix(version, matrix, source)
    }

    /// Deterministic mock store: values uniform in [0, 1) from `seed`
    pub fn mock(version: ModelVersion, seed: u64, rows: usize, dim: usize) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let matrix = Array2::from_shape_fn((rows, dim), |_| rng.gen::<f64>());

        Self::from_matrix(version, matrix, EmbeddingSource::Mock { seed })
    }

    /// Load a persisted store (JSON array of rows)
    pub fn load_json(version: ModelVersion, path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let rows: Vec<Vec<f64>> = serde_json::from_str(&data).map_err(|e| {
            SimRouteError::invalid_embeddings(format!("{}: {}", path.display(), e))
        })?;

        Self::from_rows(version, rows, EmbeddingSource::File(path.to_path_buf()))
    }

    /// Persist the matrix in the layout `load_json` reads
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let rows: Vec<Vec<f64>> = self
            .matrix
            .outer_iter()
            .map(|row| row.to_vec())
            .collect();
        std::fs::write(path, serde_json::to_string(&rows)?)?;

        debug!("Saved {} embeddings to {}", self.version, path.display());
        Ok(())
    }

    pub fn version(&self) -> ModelVersion {
        self.version
    }

    /// Number of stored vectors (N)
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    /// Embedding dimension (D)
    pub fn dim(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn source(&self) -> &EmbeddingSource {
        &self.source
    }

    /// Stored vector at `index`
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.len()).then(|| self.matrix.row(index))
    }

    /// Exact brute-force cosine search against every row
    ///
    /// The caller guarantees `query.len() == self.dim()`.
    pub(crate) fn rank(&self, query: &[f64], top_k: usize) -> Vec<SimilarityResult> {
        let mut q = Array1::from(query.to_vec());
        normalize(q.view_mut());

        let dots = self.unit.dot(&q);

        rank_top_k(dots.iter().map(|&dot| unit_cosine(dot)), top_k)
    }

    /// Hex SHA-256 over the shape and little-endian values, row-major
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.len() as u64).to_le_bytes());
        hasher.update((self.dim() as u64).to_le_bytes());
        for value in self.matrix.iter() {
            hasher.update(value.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }

    pub fn info(&self) -> StoreInfo {
        StoreInfo {
            rows: self.len(),
            dim: self.dim(),
            source: self.source.label(),
            fingerprint: self.fingerprint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_is_deterministic() {
        let a = VectorStore::mock(ModelVersion::V1, 42, MOCK_ROWS, MOCK_DIM).unwrap();
        let b = VectorStore::mock(ModelVersion::V1, 42, MOCK_ROWS, MOCK_DIM).unwrap();
        assert_eq!(a.len(), 100);
        assert_eq!(a.dim(), 64);
        assert_eq!(a.matrix, b.matrix);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_mock_values_in_unit_interval() {
        let store = VectorStore::mock(ModelVersion::V2, 7, 10, 8).unwrap();
        assert!(store.matrix.iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = VectorStore::mock(ModelVersion::V1, 1, 10, 4).unwrap();
        let b = VectorStore::mock(ModelVersion::V1, 2, 10, 4).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        let err = VectorStore::from_rows(ModelVersion::V1, rows, EmbeddingSource::Mock { seed: 0 })
            .unwrap_err();
        assert!(matches!(err, SimRouteError::InvalidEmbeddings(_)));
    }

    #[test]
    fn test_empty_rows_rejected() {
        let err = VectorStore::from_rows(ModelVersion::V1, Vec::new(), EmbeddingSource::Mock { seed: 0 })
            .unwrap_err();
        assert!(matches!(err, SimRouteError::InvalidEmbeddings(_)));
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(embeddings_file_name(ModelVersion::V2));

        let store = VectorStore::mock(ModelVersion::V2, 3, 5, 4).unwrap();
        store.save_json(&path).unwrap();

        let loaded = VectorStore::load_json(ModelVersion::V2, &path).unwrap();
        assert_eq!(loaded.matrix, store.matrix);
        assert_eq!(loaded.fingerprint(), store.fingerprint());
        assert_eq!(loaded.source(), &EmbeddingSource::File(path));
    }

    #[test]
    fn test_rank_scores_cosine() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]];
        let store = VectorStore::from_rows(ModelVersion::V1, rows, EmbeddingSource::Mock { seed: 0 })
            .unwrap();

        let ranked = store.rank(&[0.0, 2.0], 3);
        assert_eq!(ranked[0].index, 1);
        assert!((ranked[0].similarity - 1.0).abs() < 1e-12);
        // zero row and orthogonal row tie at 0, lower index first
        assert_eq!(ranked[1].index, 0);
        assert_eq!(ranked[2].index, 2);
    }

    #[test]
    fn test_rank_with_huge_finite_rows() {
        let rows = vec![vec![1e308, 1e308], vec![1.0, 0.0], vec![-1e308, 0.0]];
        let store = VectorStore::from_rows(ModelVersion::V1, rows, EmbeddingSource::Mock { seed: 0 })
            .unwrap();

        let ranked = store.rank(&[1.0, 1.0], 3);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!((ranked[0].similarity - 1.0).abs() < 1e-12);
        assert!((ranked[2].similarity + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }
}
