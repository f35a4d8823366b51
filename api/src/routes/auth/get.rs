use axum::{Extension, extract::State, http::StatusCode, response::Response};
use services::user_service::UserService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond};

/// GET /auth/me
///
/// Returns the account behind the bearer token.
pub async fn get_me(State(state): State<AppState>, Extension(AuthUser(claims)): Extension<AuthUser>) -> Response {
    match UserService::get(state.db(), claims.sub).await {
        Ok(user) => respond(StatusCode::OK, user, "User retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve user"),
    }
}
