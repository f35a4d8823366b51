use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use services::user_service::{UserQuery, UserService};
use util::state::AppState;

use crate::routes::common::{error_response, respond};

/// GET /users
///
/// ### Query Parameters
/// - `search` (optional): matches username or email
/// - `role` (optional): `admin` or `encoder`
/// - `page`, `per_page` (optional): pagination, `per_page` capped at 100
///
/// ### Response
/// - `200 OK` with `{ items, page, per_page, total }`
pub async fn list_users(State(state): State<AppState>, Query(query): Query<UserQuery>) -> Response {
    match UserService::list(state.db(), &query).await {
        Ok(page) => respond(StatusCode::OK, page, "Users retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve users"),
    }
}

/// GET /users/{user_id}
pub async fn get_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> Response {
    match UserService::get(state.db(), user_id).await {
        Ok(user) => respond(StatusCode::OK, user, "User retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve user"),
    }
}
