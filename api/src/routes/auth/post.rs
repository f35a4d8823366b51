use axum::{Json, extract::State, http::StatusCode, response::Response};
use common::format_validation_errors;
use db::models::user;
use serde::{Deserialize, Serialize};
use services::audit_service::{AuditAction, AuditEntity, AuditService};
use services::user_service::UserService;
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::routes::common::{bad_request, error_response, respond, unauthorized};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: user::Model,
}

/// POST /auth/login
///
/// ### Request Body
/// ```json
/// { "username": "registrar", "password": "secret123" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ token, expires_at, user }`
/// - `400 Bad Request` when a field is empty
/// - `401 Unauthorized` for unknown users, wrong passwords and inactive accounts
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    if let Err(errors) = req.validate() {
        return bad_request(format_validation_errors(&errors));
    }

    let db = state.db();
    match UserService::authenticate(db, &req.username, &req.password).await {
        Ok(Some(user)) => {
            let (token, expires_at) = generate_jwt(user.id, user.is_admin());
            AuditService::log(
                db,
                Some(user.id),
                AuditAction::Login,
                AuditEntity::User,
                Some(user.id),
                None,
            )
            .await;

            respond(
                StatusCode::OK,
                LoginResponse {
                    token,
                    expires_at,
                    user,
                },
                "Login successful",
            )
        }
        Ok(None) => {
            tracing::warn!(username = %req.username, "Failed login attempt");
            unauthorized("Invalid username or password")
        }
        Err(e) => error_response(e, "Failed to log in"),
    }
}
