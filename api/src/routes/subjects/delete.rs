use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use services::subject_service::SubjectService;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::routes::common::{
    BulkDeleteRequest, DeleteAck, DeleteQuery, bad_request, error_response, respond, service_context,
};

/// DELETE /subjects/{subject_id}?force=true|false
///
/// A standard delete refuses while reservations or grades reference the subject.
/// A force delete removes them together with the subject.
///
/// ### Responses
/// - `200 OK` with `{ "success": true }`
/// - `404 Not Found`
/// - `409 Conflict` with `code = "PREREQUISITE_FAILED"`
pub async fn delete_subject(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(subject_id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match SubjectService::delete(state.db(), &ctx, subject_id, query.force).await {
        Ok(()) => respond(StatusCode::OK, DeleteAck { success: true }, "Subject deleted successfully"),
        Err(e) => error_response(e, "Failed to delete subject"),
    }
}

/// DELETE /subjects/bulk
///
/// ### Request Body
/// ```json
/// { "ids": [1, 2, 3], "force": false }
/// ```
///
/// ### Response
/// - `200 OK` with `{ deleted_count, skipped_count, skipped_codes }`; without
///   `force`, subjects that still have reservations or grades are skipped
/// - `404 Not Found` if any id is unknown; nothing is deleted
pub async fn bulk_delete_subjects(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BulkDeleteRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return bad_request(format_validation_errors(&errors));
    }

    let ctx = service_context(&state, &claims);
    match SubjectService::bulk_delete(state.db(), &ctx, &req.ids, req.force).await {
        Ok(result) => {
            let message = format!("Deleted {} subject(s)", result.deleted_count);
            respond(StatusCode::OK, result, &message)
        }
        Err(e) => error_response(e, "Failed to delete subjects"),
    }
}
