//! HTTP mapping of core errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use orbit_core::Error;
use serde::Serialize;
use tracing::{error, warn};

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Core error carried out of a handler.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) | Error::OutOfRange(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) | Error::EmptySeries => StatusCode::NOT_FOUND,
            Error::Locate(_) => StatusCode::BAD_GATEWAY,
            Error::Parse(_)
            | Error::Database(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, "request failed: {}", self.0);
        } else {
            warn!(%status, "request rejected: {}", self.0);
        }

        let body = ErrorResponse {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
