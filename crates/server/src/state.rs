use simroute_ab::{TrafficRouter, TrafficSplit};
use simroute_common::{AppConfig, Result};
use simroute_vector::{DirectoryLoader, EngineRegistry};
use tracing::info;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// A/B router and latency metrics
    pub router: TrafficRouter,

    /// One similarity engine per routable version
    pub engines: EngineRegistry,
}

impl AppState {
    /// Build state from configuration, loading every version that can receive traffic
    pub fn new(config: AppConfig) -> Result<Self> {
        let split: TrafficSplit = config.traffic_split.parse()?;
        let loader = DirectoryLoader::from_config(&config);
        let engines = EngineRegistry::load(&loader, &split.active_versions())?;

        info!(
            "Application state ready - split: {:?}, embeddings: {}",
            split.weights(),
            loader.dir().display()
        );

        Ok(Self::with_parts(config, TrafficRouter::new(split), engines))
    }

    pub fn with_parts(config: AppConfig, router: TrafficRouter, engines: EngineRegistry) -> Self {
        Self {
            config,
            router,
            engines,
        }
    }
}
