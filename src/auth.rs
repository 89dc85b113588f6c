//! Request identity extraction.
//!
//! The real authentication mechanism lives in front of this server; by the
//! time a request arrives here it carries the resolved identity as headers.
//! `x-user-id` is required, `x-admin: true` grants admin.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};

use cadence_core::Identity;

use crate::routes::ErrorResponse;

/// Extractor wrapping the per-request [`Identity`].
pub struct RequestIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "missing x-user-id header".to_string(),
                    }),
                )
                    .into_response()
            })?;

        let is_admin = parts
            .headers
            .get("x-admin")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(RequestIdentity(Identity {
            user_id: user_id.to_string(),
            is_admin,
        }))
    }
}
