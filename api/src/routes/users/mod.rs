//! # Users Routes Module
//!
//! Account management for `/api/users`. Every route is admin only; the guard is
//! applied where this group is nested.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use delete::delete_user;
use get::{get_user, list_users};
use post::create_user;
use put::update_user;
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// - `GET /users` → `list_users`
/// - `POST /users` → `create_user`
/// - `GET /users/{user_id}` → `get_user`
/// - `PUT /users/{user_id}` → `update_user`
/// - `DELETE /users/{user_id}` → `delete_user`
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/{user_id}", get(get_user))
        .route("/{user_id}", put(update_user))
        .route("/{user_id}", delete(delete_user))
}
