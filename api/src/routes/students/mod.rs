//! `/students` routes.
//!
//! Changing `course_id` through `PUT /students/{student_id}` is a course transfer:
//! the student's records in the old course are held and any held records in the
//! new course come back.

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use delete::delete_student;
use get::{get_student, list_students};
use post::{bulk_create_students, create_student};
use put::update_student;
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// - `GET /students` → `list_students`
/// - `POST /students` → `create_student`
/// - `POST /students/bulk` → `bulk_create_students`
/// - `GET /students/{student_id}` → `get_student`
/// - `PUT /students/{student_id}` → `update_student`
/// - `DELETE /students/{student_id}` → `delete_student` (admin)
pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/", post(create_student))
        .route("/bulk", post(bulk_create_students))
        .route("/{student_id}", get(get_student))
        .route("/{student_id}", put(update_student))
        .route("/{student_id}", delete(delete_student).route_layer(from_fn(allow_admin)))
}
