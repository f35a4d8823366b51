//! `/courses` routes. Reads are open to any signed-in user; writes and deletes
//! are admin only.

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use delete::{bulk_delete_courses, delete_course};
use get::{get_course, list_courses};
use post::create_course;
use put::update_course;
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// - `GET /courses` → `list_courses`
/// - `POST /courses` → `create_course` (admin)
/// - `DELETE /courses/bulk` → `bulk_delete_courses` (admin)
/// - `GET /courses/{course_id}` → `get_course`
/// - `PUT /courses/{course_id}` → `update_course` (admin)
/// - `DELETE /courses/{course_id}?force=` → `delete_course` (admin)
pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/", post(create_course).route_layer(from_fn(allow_admin)))
        .route("/bulk", delete(bulk_delete_courses).route_layer(from_fn(allow_admin)))
        .route("/{course_id}", get(get_course))
        .route("/{course_id}", put(update_course).route_layer(from_fn(allow_admin)))
        .route("/{course_id}", delete(delete_course).route_layer(from_fn(allow_admin)))
}
