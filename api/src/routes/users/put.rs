use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::user_service::{UpdateUser, UserService};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// PUT /users/{user_id}
///
/// Partial update of `email`, `password`, `role` and `active`. The system account
/// must stay an active admin.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUser>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match UserService::update(state.db(), &ctx, user_id, req).await {
        Ok(user) => respond(StatusCode::OK, user, "User updated successfully"),
        Err(e) => error_response(e, "Failed to update user"),
    }
}
