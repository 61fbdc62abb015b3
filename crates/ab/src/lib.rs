//! SimRoute A/B Routing
//!
//! Weighted traffic splitting between model versions and per-version
//! latency metrics.

mod metrics;
mod router;
mod split;

pub use metrics::{LatencySummary, MetricsLog};
pub use router::TrafficRouter;
pub use split::TrafficSplit;
