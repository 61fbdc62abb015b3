//! SimRoute HTTP Server
//!
//! Actix-web REST API: health, latency metrics, model info and
//! A/B-routed similarity search.

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{error::InternalError, web, App, HttpRequest, HttpResponse, HttpServer};
use simroute_common::{AppConfig, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use state::AppState;

use types::ErrorResponse;

/// Register routes and request extractors
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(routes::health)
        .service(routes::get_metrics)
        .service(routes::get_metrics_summary)
        .service(routes::get_models)
        .service(routes::find_similar)
        .default_service(web::route().to(not_found));
}

/// Malformed JSON bodies get the same structured error as every other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!("Rejected body for {}: {}", req.path(), err);
        let response = HttpResponse::BadRequest().json(ErrorResponse::new("invalid_json", err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not_found",
        format!("No route for {} {}", req.method(), req.path()),
    ))
}

/// Load engines and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config)?);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
