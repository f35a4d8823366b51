use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::course_service::{CourseService, UpdateCourse};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// PUT /courses/{course_id}
///
/// Partial update. `"description": null` clears the description.
pub async fn update_course(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(course_id): Path<i64>,
    Json(req): Json<UpdateCourse>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match CourseService::update(state.db(), &ctx, course_id, req).await {
        Ok(course) => respond(StatusCode::OK, course, "Course updated successfully"),
        Err(e) => error_response(e, "Failed to update course"),
    }
}
