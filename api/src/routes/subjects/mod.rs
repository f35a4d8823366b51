//! `/subjects` routes. Reads are open to any signed-in user; writes and deletes
//! are admin only.

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use delete::{bulk_delete_subjects, delete_subject};
use get::{get_subject, list_subjects};
use post::create_subject;
use put::update_subject;
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// - `GET /subjects` → `list_subjects`
/// - `POST /subjects` → `create_subject` (admin)
/// - `DELETE /subjects/bulk` → `bulk_delete_subjects` (admin)
/// - `GET /subjects/{subject_id}` → `get_subject`
/// - `PUT /subjects/{subject_id}` → `update_subject` (admin)
/// - `DELETE /subjects/{subject_id}?force=` → `delete_subject` (admin)
pub fn subjects_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subjects))
        .route("/", post(create_subject).route_layer(from_fn(allow_admin)))
        .route("/bulk", delete(bulk_delete_subjects).route_layer(from_fn(allow_admin)))
        .route("/{subject_id}", get(get_subject))
        .route("/{subject_id}", put(update_subject).route_layer(from_fn(allow_admin)))
        .route("/{subject_id}", delete(delete_subject).route_layer(from_fn(allow_admin)))
}
