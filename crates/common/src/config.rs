use crate::error::SimRouteError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default traffic split when `TRAFFIC_SPLIT` is not set
pub const DEFAULT_TRAFFIC_SPLIT: &str = "v1=0.7,v2=0.3";

/// SimRoute application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Directory holding `mock_embeddings_{version}.json` files
    pub embeddings_dir: PathBuf,

    /// Synthesize deterministic mock embeddings when a version has no file
    pub allow_mock_embeddings: bool,

    /// Seed for mock embedding generation
    pub mock_seed: u64,

    /// Traffic split, e.g. "v1=0.7,v2=0.3"
    pub traffic_split: String,

    /// top_k used when a request does not specify one
    pub default_top_k: usize,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            embeddings_dir: PathBuf::from("./data"),
            allow_mock_embeddings: false,
            mock_seed: 42,
            traffic_split: DEFAULT_TRAFFIC_SPLIT.to_string(),
            default_top_k: 10,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, SimRouteError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT")?
                .unwrap_or(defaults.server_port),
            embeddings_dir: Self::get_env_path("EMBEDDINGS_DIR")
                .unwrap_or(defaults.embeddings_dir),
            allow_mock_embeddings: std::env::var("ALLOW_MOCK_EMBEDDINGS")
                .ok()
                .map(|v| parse_bool(&v))
                .transpose()?
                .unwrap_or(defaults.allow_mock_embeddings),
            mock_seed: Self::get_env_parsed("MOCK_SEED")?
                .unwrap_or(defaults.mock_seed),
            traffic_split: std::env::var("TRAFFIC_SPLIT")
                .unwrap_or(defaults.traffic_split),
            default_top_k: Self::get_env_parsed("DEFAULT_TOP_K")?
                .unwrap_or(defaults.default_top_k),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Parse an environment variable, failing loudly on malformed values
    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, SimRouteError> {
        match std::env::var(key) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| SimRouteError::config(format!("{} has invalid value '{}'", key, raw))),
            Err(_) => Ok(None),
        }
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SimRouteError> {
        if self.server_port == 0 {
            return Err(SimRouteError::config("Server port cannot be 0"));
        }

        if self.default_top_k == 0 {
            return Err(SimRouteError::config("DEFAULT_TOP_K must be greater than 0"));
        }

        if self.traffic_split.trim().is_empty() {
            return Err(SimRouteError::config("Traffic split cannot be empty"));
        }

        Ok(())
    }
}

/// Parse a boolean flag ("1", "true", "yes", "on" and their negatives)
pub fn parse_bool(value: &str) -> Result<bool, SimRouteError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(SimRouteError::config(format!("Invalid boolean value '{}'", other))),
    }
}
