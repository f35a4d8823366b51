#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn login_returns_token_and_user() {
        let app = make_test_app().await;

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "encoder", "password": "password123" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(json["data"]["user"]["username"], "encoder");
        assert_eq!(json["data"]["user"]["role"], "encoder");
        assert!(json["data"]["user"].get("password_hash").is_none());

        let token = json["data"]["token"].as_str().unwrap().to_string();
        let (status, me) = send(&app.router, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["data"]["id"], app.encoder.id);
    }

    #[tokio::test]
    #[serial]
    async fn login_rejects_wrong_password() {
        let app = make_test_app().await;

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "not-the-password" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid username or password");
    }

    #[tokio::test]
    #[serial]
    async fn login_rejects_empty_fields() {
        let app = make_test_app().await;

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "", "password": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    #[serial]
    async fn me_requires_token() {
        let app = make_test_app().await;

        let (status, json) = send(&app.router, "GET", "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Authentication required");

        let (status, _) = send(&app.router, "GET", "/api/auth/me", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn successful_login_is_audited() {
        let app = make_test_app().await;

        send(
            &app.router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "password123" })),
        )
        .await;

        let token = token_for(&app.admin);
        let (status, json) = send(
            &app.router,
            "GET",
            "/api/audit-logs?action=LOGIN",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["user_id"], app.admin.id);
    }
}
