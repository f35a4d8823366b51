use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use services::student_service::{StudentQuery, StudentService};
use util::state::AppState;

use crate::routes::common::{error_response, respond};

/// GET /students
///
/// ### Query Parameters
/// - `search` (optional): matches student number, names or email
/// - `course_id` (optional)
/// - `page`, `per_page` (optional)
pub async fn list_students(State(state): State<AppState>, Query(query): Query<StudentQuery>) -> Response {
    match StudentService::list(state.db(), &query).await {
        Ok(page) => respond(StatusCode::OK, page, "Students retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve students"),
    }
}

/// GET /students/{student_id}
///
/// The student with their course and the active reservations and grades of that
/// course. Records held from earlier courses are not included.
pub async fn get_student(State(state): State<AppState>, Path(student_id): Path<i64>) -> Response {
    match StudentService::get_profile(state.db(), student_id).await {
        Ok(profile) => respond(StatusCode::OK, profile, "Student retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve student"),
    }
}
