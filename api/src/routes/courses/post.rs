use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use services::course_service::{CourseService, CreateCourse};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// POST /courses
///
/// ### Request Body
/// ```json
/// { "code": "BSCS", "name": "BS Computer Science", "description": null }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the code exists
pub async fn create_course(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateCourse>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match CourseService::create(state.db(), &ctx, req).await {
        Ok(course) => respond(StatusCode::CREATED, course, "Course created successfully"),
        Err(e) => error_response(e, "Failed to create course"),
    }
}
