//! `/reservations` routes. Every reservation is paired with a grade in the
//! subject's course: creating one opens a Pending grade, deleting one removes it.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use delete::{bulk_delete_reservations, delete_reservation};
use get::{get_reservation, list_reservations};
use post::{bulk_create_reservations, create_reservation};
use put::update_reservation;
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// - `GET /reservations` → `list_reservations`
/// - `POST /reservations` → `create_reservation`
/// - `POST /reservations/bulk` → `bulk_create_reservations`
/// - `DELETE /reservations/bulk` → `bulk_delete_reservations`
/// - `GET /reservations/{reservation_id}` → `get_reservation`
/// - `PUT /reservations/{reservation_id}` → `update_reservation`
/// - `DELETE /reservations/{reservation_id}` → `delete_reservation`
pub fn reservations_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations))
        .route("/", post(create_reservation))
        .route("/bulk", post(bulk_create_reservations))
        .route("/bulk", delete(bulk_delete_reservations))
        .route("/{reservation_id}", get(get_reservation))
        .route("/{reservation_id}", put(update_reservation))
        .route("/{reservation_id}", delete(delete_reservation))
}
