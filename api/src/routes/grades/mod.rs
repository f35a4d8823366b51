//! `/grades` routes. `final_grade` and `remarks` are always derived from the
//! component scores on write.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use delete::delete_grade;
use get::{get_grade, list_grades};
use post::{create_grade, upsert_grade};
use put::update_grade;
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// - `GET /grades` → `list_grades`
/// - `POST /grades` → `create_grade`
/// - `POST /grades/upsert` → `upsert_grade`
/// - `GET /grades/{grade_id}` → `get_grade`
/// - `PUT /grades/{grade_id}` → `update_grade`
/// - `DELETE /grades/{grade_id}` → `delete_grade`
pub fn grades_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades))
        .route("/", post(create_grade))
        .route("/upsert", post(upsert_grade))
        .route("/{grade_id}", get(get_grade))
        .route("/{grade_id}", put(update_grade))
        .route("/{grade_id}", delete(delete_grade))
}
