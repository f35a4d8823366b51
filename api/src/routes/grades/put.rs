use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::grade_service::{GradeService, UpdateGrade};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// PUT /grades/{grade_id}
///
/// Replaces the component scores; omitted scores are cleared.
pub async fn update_grade(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(grade_id): Path<i64>,
    Json(req): Json<UpdateGrade>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match GradeService::update(state.db(), &ctx, grade_id, req).await {
        Ok(grade) => respond(StatusCode::OK, grade, "Grade updated successfully"),
        Err(e) => error_response(e, "Failed to update grade"),
    }
}
