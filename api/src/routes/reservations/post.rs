use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use services::reservation_service::{BulkCreateReservations, CreateReservation, ReservationService};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{error_response, respond, service_context};

/// POST /reservations
///
/// ### Request Body
/// ```json
/// { "student_id": 1, "subject_id": 4 }
/// ```
///
/// ### Responses
/// - `201 Created` with the reservation and its subject; a Pending grade is
///   created alongside it
/// - `400 Bad Request` when the student is not enrolled or the subject belongs to
///   another course
/// - `404 Not Found` when the student or subject does not exist
/// - `409 Conflict` with `"Subject already reserved"`
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateReservation>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match ReservationService::create(state.db(), &ctx, req).await {
        Ok(reservation) => respond(StatusCode::CREATED, reservation, "Reservation created successfully"),
        Err(e) => error_response(e, "Failed to create reservation"),
    }
}

/// POST /reservations/bulk
///
/// ### Request Body
/// ```json
/// { "student_id": 1, "subject_ids": [4, 5, 6] }
/// ```
///
/// Subjects already reserved by the student are skipped. Only subjects of the
/// student's current course are accepted.
///
/// ### Responses
/// - `201 Created` with the reservations that were created
/// - `400 Bad Request` when `subject_ids` is empty or the student is not enrolled
pub async fn bulk_create_reservations(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BulkCreateReservations>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match ReservationService::bulk_create(state.db(), &ctx, req).await {
        Ok(created) => {
            let message = format!("Created {} reservation(s)", created.len());
            respond(StatusCode::CREATED, created, &message)
        }
        Err(e) => error_response(e, "Failed to create reservations"),
    }
}
