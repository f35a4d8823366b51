use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use serde::{Deserialize, Serialize};
use services::audit_service::AuditService;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::routes::common::{DeleteAck, bad_request, error_response, respond};

#[derive(Debug, Deserialize, Validate)]
pub struct BulkDeleteAuditLogsRequest {
    #[validate(length(min = 1, message = "Request must include a non-empty list of ids"))]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteAuditLogsResponse {
    pub deleted_count: u64,
}

/// DELETE /audit-logs/{log_id}
pub async fn delete_audit_log(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(log_id): Path<i64>,
) -> Response {
    match AuditService::delete(state.db(), Some(claims.sub), log_id).await {
        Ok(()) => respond(StatusCode::OK, DeleteAck { success: true }, "Audit log deleted successfully"),
        Err(e) => error_response(e, "Failed to delete audit log"),
    }
}

/// DELETE /audit-logs/bulk
///
/// ### Request Body
/// ```json
/// { "ids": [1, 2, 3] }
/// ```
pub async fn bulk_delete_audit_logs(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BulkDeleteAuditLogsRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return bad_request(format_validation_errors(&errors));
    }

    match AuditService::bulk_delete(state.db(), Some(claims.sub), &req.ids).await {
        Ok(deleted_count) => respond(
            StatusCode::OK,
            BulkDeleteAuditLogsResponse { deleted_count },
            &format!("Deleted {deleted_count} audit log(s)"),
        ),
        Err(e) => error_response(e, "Failed to delete audit logs"),
    }
}
