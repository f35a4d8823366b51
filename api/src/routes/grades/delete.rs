use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::grade_service::GradeService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{DeleteAck, error_response, respond, service_context};

/// DELETE /grades/{grade_id}
pub async fn delete_grade(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(grade_id): Path<i64>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match GradeService::delete(state.db(), &ctx, grade_id).await {
        Ok(()) => respond(StatusCode::OK, DeleteAck { success: true }, "Grade deleted successfully"),
        Err(e) => error_response(e, "Failed to delete grade"),
    }
}
