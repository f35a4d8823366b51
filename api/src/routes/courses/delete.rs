use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use services::course_service::CourseService;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::routes::common::{
    BulkDeleteRequest, DeleteAck, DeleteQuery, bad_request, error_response, respond, service_context,
};

/// DELETE /courses/{course_id}?force=true|false
///
/// A standard delete refuses when students or subjects still reference the course.
/// A force delete removes its subjects together with their grades and reservations,
/// and unenrolls its students.
///
/// ### Responses
/// - `200 OK` with `{ "success": true }`
/// - `404 Not Found`
/// - `409 Conflict` with `code = "PREREQUISITE_FAILED"`
/// ```json
/// {
///   "success": false,
///   "data": null,
///   "message": "Cannot delete course BSCS: it has 12 enrolled student(s) and 40 subject(s). Use force delete to remove them.",
///   "code": "PREREQUISITE_FAILED"
/// }
/// ```
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(course_id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match CourseService::delete(state.db(), &ctx, course_id, query.force).await {
        Ok(()) => respond(StatusCode::OK, DeleteAck { success: true }, "Course deleted successfully"),
        Err(e) => error_response(e, "Failed to delete course"),
    }
}

/// DELETE /courses/bulk
///
/// ### Request Body
/// ```json
/// { "ids": [1, 2, 3], "force": false }
/// ```
///
/// ### Response
/// - `200 OK` with `{ deleted_count, skipped_count, skipped_codes }`; without
///   `force`, courses that still have dependents are skipped
/// - `404 Not Found` if any id is unknown; nothing is deleted
pub async fn bulk_delete_courses(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BulkDeleteRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return bad_request(format_validation_errors(&errors));
    }

    let ctx = service_context(&state, &claims);
    match CourseService::bulk_delete(state.db(), &ctx, &req.ids, req.force).await {
        Ok(result) => {
            let message = format!("Deleted {} course(s)", result.deleted_count);
            respond(StatusCode::OK, result, &message)
        }
        Err(e) => error_response(e, "Failed to delete courses"),
    }
}
