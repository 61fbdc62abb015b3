/// SimRoute error types
#[derive(Debug, thiserror::Error)]
pub enum SimRouteError {
    /// Model version tag outside the supported set
    #[error("Invalid model version '{0}': model version must be 'v1' or 'v2'")]
    InvalidVersion(String),

    /// Query vector length differs from the store dimensionality
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration error (malformed traffic split, bad settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No persisted embeddings and mock fallback disabled
    #[error("Embeddings not found: {0}")]
    EmbeddingsNotFound(String),

    /// Persisted embeddings exist but are malformed
    #[error("Invalid embeddings: {0}")]
    InvalidEmbeddings(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimRouteError {
    /// Create invalid version error
    pub fn invalid_version<S: Into<String>>(version: S) -> Self {
        Self::InvalidVersion(version.into())
    }

    /// Create dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create embeddings not found error
    pub fn embeddings_not_found<S: Into<String>>(msg: S) -> Self {
        Self::EmbeddingsNotFound(msg.into())
    }

    /// Create invalid embeddings error
    pub fn invalid_embeddings<S: Into<String>>(msg: S) -> Self {
        Self::InvalidEmbeddings(msg.into())
    }
}

impl SimRouteError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidVersion(_) => 400,
            Self::DimensionMismatch { .. } => 400,
            Self::InvalidInput(_) => 400,
            Self::Json(_) => 400,
            Self::Configuration(_) => 500,
            Self::EmbeddingsNotFound(_) => 503,
            Self::InvalidEmbeddings(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidVersion(_) => "invalid_version",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::Configuration(_) => "configuration_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::EmbeddingsNotFound(_) => "embeddings_not_found",
            Self::InvalidEmbeddings(_) => "invalid_embeddings",
            Self::Io(_) => "io_error",
            Self::Json(_) => "invalid_json",
            Self::Other(_) => "internal_error",
        }
    }
}
