#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn encoders_cannot_manage_users() {
        let app = make_test_app().await;
        let token = token_for(&app.encoder);

        let (status, json) = send(&app.router, "GET", "/api/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");
    }

    #[tokio::test]
    #[serial]
    async fn admin_creates_lists_and_updates_users() {
        let app = make_test_app().await;
        let token = token_for(&app.admin);

        let (status, created) = send(
            &app.router,
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "username": "registrar",
                "email": "registrar@test.com",
                "password": "changeme123",
                "role": "encoder"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["data"].get("password_hash").is_none());
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, page) = send(&app.router, "GET", "/api/users?role=encoder", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"]["total"], 2);

        let (status, updated) = send(
            &app.router,
            "PUT",
            &format!("/api/users/{id}"),
            Some(&token),
            Some(json!({ "active": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["active"], false);

        let (status, _) = send(
            &app.router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "registrar", "password": "changeme123" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn duplicate_username_is_conflict() {
        let app = make_test_app().await;
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "username": "encoder",
                "email": "other@test.com",
                "password": "changeme123",
                "role": "encoder"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "CONFLICT");
    }

    #[tokio::test]
    #[serial]
    async fn admin_cannot_delete_self_or_demote_system_account() {
        let app = make_test_app().await;
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "DELETE",
            &format!("/api/users/{}", app.admin.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let (status, _) = send(
            &app.router,
            "PUT",
            &format!("/api/users/{}", app.admin.id),
            Some(&token),
            Some(json!({ "role": "encoder" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn delete_user_then_get_is_not_found() {
        let app = make_test_app().await;
        let token = token_for(&app.admin);
        let uri = format!("/api/users/{}", app.encoder.id);

        let (status, json) = send(&app.router, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["success"], true);

        let (status, json) = send(&app.router, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "User not found");
    }
}
