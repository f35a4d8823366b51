use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use services::subject_service::{SubjectService, UpdateSubject};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// PUT /subjects/{subject_id}
///
/// Partial update. Moving a subject to another course is refused while it has
/// reservations or grades.
pub async fn update_subject(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(subject_id): Path<i64>,
    Json(req): Json<UpdateSubject>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match SubjectService::update(state.db(), &ctx, subject_id, req).await {
        Ok(subject) => respond(StatusCode::OK, subject, "Subject updated successfully"),
        Err(e) => error_response(e, "Failed to update subject"),
    }
}
