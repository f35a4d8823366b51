use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use services::subject_service::{CreateSubject, SubjectService};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// POST /subjects
///
/// ### Request Body
/// ```json
/// { "course_id": 1, "code": "CS101", "title": "Introduction to Computing", "units": 3 }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` on validation failure
/// - `404 Not Found` when the course does not exist
/// - `409 Conflict` when the title is already used in that course
pub async fn create_subject(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateSubject>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match SubjectService::create(state.db(), &ctx, req).await {
        Ok(subject) => respond(StatusCode::CREATED, subject, "Subject created successfully"),
        Err(e) => error_response(e, "Failed to create subject"),
    }
}
