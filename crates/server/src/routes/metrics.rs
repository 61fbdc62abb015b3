use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::MetricsSummaryResponse;

/// Mean latency (seconds) per observed model version
#[get("/metrics")]
pub async fn get_metrics(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(state.router.get_metrics().await)
}

#[get("/metrics/summary")]
pub async fn get_metrics_summary(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(MetricsSummaryResponse {
        started_at: state.router.started_at(),
        versions: state.router.summary().await,
    })
}
