//! `/audit-logs` routes (admin only).

use axum::{
    Router,
    routing::{delete, get},
};
use delete::{bulk_delete_audit_logs, delete_audit_log};
use get::list_audit_logs;
use util::state::AppState;

pub mod delete;
pub mod get;

/// - `GET /audit-logs` → `list_audit_logs`
/// - `DELETE /audit-logs/bulk` → `bulk_delete_audit_logs`
/// - `DELETE /audit-logs/{log_id}` → `delete_audit_log`
pub fn audit_logs_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_audit_logs))
        .route("/bulk", delete(bulk_delete_audit_logs))
        .route("/{log_id}", delete(delete_audit_log))
}
