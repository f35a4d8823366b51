use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use services::subject_service::{SubjectQuery, SubjectService};
use util::state::AppState;

use crate::routes::common::{error_response, respond};

/// GET /subjects
///
/// ### Query Parameters
/// - `course_id` (optional): only subjects of this course
/// - `search` (optional): matches code or title
/// - `page`, `per_page` (optional)
pub async fn list_subjects(State(state): State<AppState>, Query(query): Query<SubjectQuery>) -> Response {
    match SubjectService::list(state.db(), &query).await {
        Ok(page) => respond(StatusCode::OK, page, "Subjects retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve subjects"),
    }
}

/// GET /subjects/{subject_id}
pub async fn get_subject(State(state): State<AppState>, Path(subject_id): Path<i64>) -> Response {
    match SubjectService::get(state.db(), subject_id).await {
        Ok(subject) => respond(StatusCode::OK, subject, "Subject retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve subject"),
    }
}
