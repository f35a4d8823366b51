use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use services::{ServiceContext, ServiceError};
use util::state::AppState;
use validator::Validate;

use crate::auth::Claims;
use crate::auth::guards::Empty;
use crate::response::ApiResponse;

/// Service context for the signed-in user.
pub fn service_context(state: &AppState, claims: &Claims) -> ServiceContext {
    ServiceContext::new(Some(claims.sub), state.system_actor_id())
}

pub fn respond<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    (status, Json(ApiResponse::success(data, message))).into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<Empty>::error_with_code(message, "VALIDATION_FAILED")),
    )
        .into_response()
}

pub fn unauthorized(message: impl Into<String>) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<Empty>::error(message)),
    )
        .into_response()
}

/// Maps a service failure onto a status code and the error envelope.
///
/// Internal failures are logged and answered with `fallback`; their details never
/// reach the client.
pub fn error_response(err: ServiceError, fallback: &str) -> Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) | ServiceError::PrerequisiteFailed { .. } => StatusCode::CONFLICT,
        ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if err.is_internal() {
        tracing::error!(error = %err, "{fallback}");
        fallback.to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(ApiResponse::<Empty>::error_with_code(message, err.error_code())),
    )
        .into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, message = "Request must include a non-empty list of ids"))]
    pub ids: Vec<i64>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteAck {
    pub success: bool,
}
