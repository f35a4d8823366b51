use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use services::reservation_service::{ReservationQuery, ReservationService};
use util::state::AppState;

use crate::routes::common::{error_response, respond};

/// GET /reservations
///
/// ### Query Parameters
/// - `student_id`, `subject_id` (optional)
/// - `status` (optional): `reserved` or `cancelled`
/// - `include_held` (optional, default `false`): include records held after a
///   course transfer
/// - `page`, `per_page` (optional)
///
/// Each item carries its `subject`.
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> Response {
    match ReservationService::list(state.db(), &query).await {
        Ok(page) => respond(StatusCode::OK, page, "Reservations retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve reservations"),
    }
}

/// GET /reservations/{reservation_id}
pub async fn get_reservation(State(state): State<AppState>, Path(reservation_id): Path<i64>) -> Response {
    match ReservationService::get(state.db(), reservation_id).await {
        Ok(reservation) => respond(StatusCode::OK, reservation, "Reservation retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve reservation"),
    }
}
