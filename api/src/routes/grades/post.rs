use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use services::grade_service::{CreateGrade, GradeService, UpsertGrade};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// POST /grades
///
/// ### Request Body
/// ```json
/// { "student_id": 1, "subject_id": 4, "prelim": 2.0, "midterm": 2.5, "finals": 3.0 }
/// ```
///
/// The grade is recorded against the student's current course.
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` when a score is outside 0–100 or the subject is not in the
///   student's course
/// - `409 Conflict` when the student already has a grade for the subject
pub async fn create_grade(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateGrade>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match GradeService::create(state.db(), &ctx, req).await {
        Ok(grade) => respond(StatusCode::CREATED, grade, "Grade created successfully"),
        Err(e) => error_response(e, "Failed to create grade"),
    }
}

/// POST /grades/upsert
///
/// Creates or replaces the grade identified by `(student_id, subject_id, course_id)`.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` with `"Student is not enrolled in this course"` or
///   `"Subject does not belong to this course"`
pub async fn upsert_grade(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<UpsertGrade>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match GradeService::upsert(state.db(), &ctx, req).await {
        Ok(grade) => respond(StatusCode::OK, grade, "Grade saved successfully"),
        Err(e) => error_response(e, "Failed to save grade"),
    }
}
