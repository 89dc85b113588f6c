pub mod events;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use cadence_core::CadenceError;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert engine errors to HTTP responses.
pub struct AppError(CadenceError);

impl From<CadenceError> for AppError {
    fn from(err: CadenceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CadenceError::Validation(_) => StatusCode::BAD_REQUEST,
            CadenceError::NotFound(_) | CadenceError::BaseNotFound(_) => StatusCode::NOT_FOUND,
            CadenceError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            CadenceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}
