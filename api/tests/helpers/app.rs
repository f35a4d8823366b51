use api::auth::generate_jwt;
use api::routes::routes;
use axum::{
    Router,
    body::Body as AxumBody,
    http::{Request, StatusCode},
    response::Response,
};
use db::models::user::{self, Role};
use db::test_utils::setup_test_db;
use serde_json::Value;
use tower::ServiceExt;
use util::{config::AppConfig, state::AppState};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin: user::Model,
    pub encoder: user::Model,
}

/// Router over a fresh in-memory database with an admin (the system actor) and
/// an encoder account.
pub async fn make_test_app() -> TestApp {
    AppConfig::set_jwt_secret("test-secret");

    let db = setup_test_db().await;
    let admin = user::Model::create(&db, "admin", "admin@test.com", "password123", Role::Admin)
        .await
        .expect("Failed to create admin");
    let encoder = user::Model::create(&db, "encoder", "encoder@test.com", "password123", Role::Encoder)
        .await
        .expect("Failed to create encoder");

    let state = AppState::new(db, admin.id);
    let router = Router::new().nest("/api", routes(state.clone()));

    TestApp {
        router,
        state,
        admin,
        encoder,
    }
}

pub fn token_for(user: &user::Model) -> String {
    generate_jwt(user.id, user.is_admin()).0
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Sends one request through the router and returns the status and JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(AxumBody::from(json.to_string()))
            .unwrap(),
        None => builder.body(AxumBody::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    (status, get_json_body(response).await)
}
