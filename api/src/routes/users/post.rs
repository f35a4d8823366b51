use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use services::user_service::{CreateUser, UserService};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// POST /users
///
/// ### Request Body
/// ```json
/// {
///   "username": "encoder1",
///   "email": "encoder1@school.edu",
///   "password": "changeme123",
///   "role": "encoder"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the new user (password hash is never serialized)
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the username or email is taken
pub async fn create_user(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateUser>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match UserService::create(state.db(), &ctx, req).await {
        Ok(user) => respond(StatusCode::CREATED, user, "User created successfully"),
        Err(e) => error_response(e, "Failed to create user"),
    }
}
