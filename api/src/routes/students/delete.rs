use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::student_service::StudentService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{DeleteAck, error_response, respond, service_context};

/// DELETE /students/{student_id}
///
/// Removes the student with all of their reservations and grades, held ones included.
pub async fn delete_student(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match StudentService::delete(state.db(), &ctx, student_id).await {
        Ok(()) => respond(StatusCode::OK, DeleteAck { success: true }, "Student deleted successfully"),
        Err(e) => error_response(e, "Failed to delete student"),
    }
}
