use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{FindSimilarRequest, FindSimilarResponse};

/// Route the query to a model version and return its nearest neighbors
#[post("/find-similar")]
pub async fn find_similar(
    req: web::Json<FindSimilarRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let start = Instant::now();

    let version = state.router.choose_version();
    let engine = state.engines.get(version)?;
    let top_k = req.top_k.unwrap_or(state.config.default_top_k);

    let results = engine.find_similar(&req.vector, Some(top_k))?;

    let elapsed = start.elapsed().as_secs_f64();
    state.router.log_performance(version, elapsed).await;

    debug!(
        "find-similar served by {} - {} results in {:.3}ms",
        version,
        results.len(),
        elapsed * 1000.0
    );

    Ok(HttpResponse::Ok().json(FindSimilarResponse {
        model_version: version,
        results,
    }))
}
