use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::subject_reservation::ReservationStatus;
use serde::Deserialize;
use services::reservation_service::ReservationService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub status: ReservationStatus,
}

/// PUT /reservations/{reservation_id}
///
/// ### Request Body
/// ```json
/// { "status": "cancelled" }
/// ```
///
/// Cancelling keeps the paired grade; `"reserved"` restores a cancelled reservation.
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(reservation_id): Path<i64>,
    Json(req): Json<UpdateReservationRequest>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match ReservationService::update_status(state.db(), &ctx, reservation_id, req.status).await {
        Ok(reservation) => respond(StatusCode::OK, reservation, "Reservation updated successfully"),
        Err(e) => error_response(e, "Failed to update reservation"),
    }
}
