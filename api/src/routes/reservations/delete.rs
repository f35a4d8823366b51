use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use serde::Deserialize;
use services::reservation_service::ReservationService;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::routes::common::{DeleteAck, bad_request, error_response, respond, service_context};

#[derive(Debug, Deserialize, Validate)]
pub struct BulkDeleteReservationsRequest {
    #[validate(length(min = 1, message = "Request must include a non-empty list of ids"))]
    pub ids: Vec<i64>,
}

/// DELETE /reservations/{reservation_id}
///
/// Deletes the reservation and its paired grade.
pub async fn delete_reservation(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(reservation_id): Path<i64>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match ReservationService::delete(state.db(), &ctx, reservation_id).await {
        Ok(()) => respond(StatusCode::OK, DeleteAck { success: true }, "Reservation deleted successfully"),
        Err(e) => error_response(e, "Failed to delete reservation"),
    }
}

/// DELETE /reservations/bulk
///
/// ### Request Body
/// ```json
/// { "ids": [10, 11] }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ deleted_count, grades_removed }`; unknown ids are ignored
/// - `404 Not Found` when none of the ids exist
pub async fn bulk_delete_reservations(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BulkDeleteReservationsRequest>,
) -> Response {
    if let Err(errors) = req.validate() {
        return bad_request(format_validation_errors(&errors));
    }

    let ctx = service_context(&state, &claims);
    match ReservationService::bulk_delete(state.db(), &ctx, &req.ids).await {
        Ok(result) => {
            let message = format!("Deleted {} reservation(s)", result.deleted_count);
            respond(StatusCode::OK, result, &message)
        }
        Err(e) => error_response(e, "Failed to delete reservations"),
    }
}
