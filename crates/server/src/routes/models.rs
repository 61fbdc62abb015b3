use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::ModelsResponse;

/// Loaded embedding stores and the traffic split
#[get("/models")]
pub async fn get_models(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(ModelsResponse {
        versions: state.engines.describe(),
        split: state.router.split().clone(),
    })
}
