use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use simroute_common::SimRouteError;
use std::fmt;
use tracing::{error, warn};

use crate::types::ErrorResponse;

/// HTTP-facing wrapper around [`SimRouteError`]
#[derive(Debug)]
pub struct ApiError(pub SimRouteError);

impl From<SimRouteError> for ApiError {
    fn from(err: SimRouteError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self.0);
        } else {
            warn!("Request rejected ({}): {}", status, self.0);
        }

        HttpResponse::build(status).json(ErrorResponse::new(self.0.kind(), self.0.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(SimRouteError::dimension_mismatch(64, 10));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(SimRouteError::embeddings_not_found("v2"));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(SimRouteError::config("bad split"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
