//! SimRoute Vector Search
//!
//! In-memory embedding stores and exact cosine nearest-neighbor search,
//! one engine per model version.

mod engine;
mod loader;
mod similarity;
mod store;
mod types;

pub use engine::{EngineRegistry, SimilarityEngine, DEFAULT_TOP_K};
pub use loader::{DirectoryLoader, EmbeddingLoader, MockSettings};
pub use store::{embeddings_file_name, VectorStore, DEFAULT_MOCK_SEED, MOCK_DIM, MOCK_ROWS};
pub use types::{EmbeddingSource, ModelVersion, SimilarityResult, StoreInfo};
