use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use services::grade_service::{GradeQuery, GradeService};
use util::state::AppState;

use crate::routes::common::{error_response, respond};

/// GET /grades
///
/// ### Query Parameters
/// - `student_id`, `subject_id`, `course_id` (optional)
/// - `remarks` (optional): `Pending`, `Passed`, `Failed` or `INC`
/// - `include_held` (optional, default `false`)
/// - `page`, `per_page` (optional)
pub async fn list_grades(State(state): State<AppState>, Query(query): Query<GradeQuery>) -> Response {
    match GradeService::list(state.db(), &query).await {
        Ok(page) => respond(StatusCode::OK, page, "Grades retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve grades"),
    }
}

/// GET /grades/{grade_id}
pub async fn get_grade(State(state): State<AppState>, Path(grade_id): Path<i64>) -> Response {
    match GradeService::get(state.db(), grade_id).await {
        Ok(grade) => respond(StatusCode::OK, grade, "Grade retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve grade"),
    }
}
