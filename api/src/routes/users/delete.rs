use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::user_service::UserService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{DeleteAck, error_response, respond, service_context};

/// DELETE /users/{user_id}
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` when deleting your own account or the system account
/// - `404 Not Found`
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match UserService::delete(state.db(), &ctx, user_id).await {
        Ok(()) => respond(StatusCode::OK, DeleteAck { success: true }, "User deleted successfully"),
        Err(e) => error_response(e, "Failed to delete user"),
    }
}
