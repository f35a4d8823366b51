#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn audit_logs_are_admin_only() {
        let app = make_test_app().await;

        let (status, _) = send(
            &app.router,
            "GET",
            "/api/audit-logs",
            Some(&token_for(&app.encoder)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn list_filters_and_deletes_entries() {
        let app = make_test_app().await;
        let token = token_for(&app.admin);

        for code in ["BSCS", "BSIT", "BSN"] {
            let (status, _) = send(
                &app.router,
                "POST",
                "/api/courses",
                Some(&token),
                Some(json!({ "code": code, "name": format!("{code} programme") })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(
            &app.router,
            "GET",
            "/api/audit-logs?entity_type=course&per_page=2",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 3);
        assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["items"][0]["action"], "CREATE_COURSE");
        assert_eq!(json["data"]["items"][0]["user_id"], app.admin.id);

        let first = json["data"]["items"][0]["id"].as_i64().unwrap();
        let second = json["data"]["items"][1]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app.router,
            "DELETE",
            &format!("/api/audit-logs/{first}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(
            &app.router,
            "DELETE",
            "/api/audit-logs/bulk",
            Some(&token),
            Some(json!({ "ids": [second, 9999] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["deleted_count"], 1);

        let (status, _) = send(
            &app.router,
            "DELETE",
            &format!("/api/audit-logs/{first}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
