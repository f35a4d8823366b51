//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/auth` → login (public) and current user (authenticated)
//! - `/users` → account management (admin only)
//! - `/courses`, `/subjects` → catalogue; reads for any signed-in user, writes for admins
//! - `/students`, `/reservations`, `/grades` → records managed by encoders and admins
//! - `/audit-logs` → audit trail (admin only)

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::routes::{
    audit_logs::audit_logs_routes, auth::auth_routes, courses::courses_routes,
    grades::grades_routes, health::health_routes, reservations::reservations_routes,
    students::students_routes, subjects::subjects_routes, users::users_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod audit_logs;
pub mod auth;
pub mod common;
pub mod courses;
pub mod grades;
pub mod health;
pub mod reservations;
pub mod students;
pub mod subjects;
pub mod users;

/// Builds the complete `/api` router with its state attached.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/users", users_routes().route_layer(from_fn(allow_admin)))
        .nest("/courses", courses_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/subjects", subjects_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/students", students_routes().route_layer(from_fn(allow_authenticated)))
        .nest(
            "/reservations",
            reservations_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/grades", grades_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/audit-logs", audit_logs_routes().route_layer(from_fn(allow_admin)))
        .with_state(app_state)
}
