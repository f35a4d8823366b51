use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use services::audit_service::{AuditLogQuery, AuditService};
use util::state::AppState;

use crate::routes::common::{error_response, respond};

/// GET /audit-logs
///
/// Newest first.
///
/// ### Query Parameters
/// - `user_id` (optional)
/// - `action` (optional), e.g. `TRANSFER_STUDENT`
/// - `entity_type` (optional), e.g. `course`
/// - `page`, `per_page` (optional)
pub async fn list_audit_logs(State(state): State<AppState>, Query(query): Query<AuditLogQuery>) -> Response {
    match AuditService::list(state.db(), &query).await {
        Ok(page) => respond(StatusCode::OK, page, "Audit logs retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve audit logs"),
    }
}
