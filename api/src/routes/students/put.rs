use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::student_service::{StudentService, UpdateStudent};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// PUT /students/{student_id}
///
/// Partial update. `"course_id": null` unenrolls the student; a different
/// `course_id` transfers them. The whole update commits or fails as one unit.
///
/// ### Responses
/// - `200 OK` with the student and their resolved course
/// - `400 Bad Request` on validation failure
/// - `404 Not Found` when the student or the target course does not exist
/// - `409 Conflict` when the new student number or email is taken
pub async fn update_student(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    Json(req): Json<UpdateStudent>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match StudentService::update(state.db(), &ctx, student_id, req).await {
        Ok(student) => respond(StatusCode::OK, student, "Student updated successfully"),
        Err(e) => error_response(e, "Failed to update student"),
    }
}
