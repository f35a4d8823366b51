//! `/auth` routes: token issue and the current user.

use crate::auth::guards::allow_authenticated;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use get::get_me;
use post::login;
use util::state::AppState;

pub mod get;
pub mod post;

/// - `POST /auth/login` → `login` (public)
/// - `GET /auth/me` → `get_me` (authenticated)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_me).route_layer(from_fn(allow_authenticated)))
}
