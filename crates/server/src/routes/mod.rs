mod metrics;
mod models;
mod search;
mod system;

pub use metrics::{get_metrics, get_metrics_summary};
pub use models::get_models;
pub use search::find_similar;
pub use system::health;
