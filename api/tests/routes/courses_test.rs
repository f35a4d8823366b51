#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::{course, student, subject};
    use sea_orm::EntityTrait;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn encoder_can_read_but_not_write_courses() {
        let app = make_test_app().await;
        course::Model::create(app.state.db(), "BSCS", "Computer Science", None)
            .await
            .unwrap();
        let token = token_for(&app.encoder);

        let (status, json) = send(&app.router, "GET", "/api/courses", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["code"], "BSCS");

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/courses",
            Some(&token),
            Some(json!({ "code": "BSIT", "name": "Information Technology" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");
    }

    #[tokio::test]
    #[serial]
    async fn courses_require_authentication() {
        let app = make_test_app().await;

        let (status, _) = send(&app.router, "GET", "/api/courses", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn admin_creates_and_updates_course() {
        let app = make_test_app().await;
        let token = token_for(&app.admin);

        let (status, created) = send(
            &app.router,
            "POST",
            "/api/courses",
            Some(&token),
            Some(json!({ "code": "BSIT", "name": "Information Technology", "description": "4 years" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, updated) = send(
            &app.router,
            "PUT",
            &format!("/api/courses/{id}"),
            Some(&token),
            Some(json!({ "description": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["description"], serde_json::Value::Null);
        assert_eq!(updated["data"]["name"], "Information Technology");

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/courses",
            Some(&token),
            Some(json!({ "code": "BSIT", "name": "Duplicate" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "CONFLICT");
    }

    #[tokio::test]
    #[serial]
    async fn standard_delete_of_course_with_dependents_is_refused() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        subject::Model::create(db, bscs.id, "CS101", "Intro", 3).await.unwrap();
        student::Model::create(db, "2024-0001", "Ana", "Reyes", Some(bscs.id)).await.unwrap();
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "DELETE",
            &format!("/api/courses/{}", bscs.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "PREREQUISITE_FAILED");
        assert_eq!(
            json["message"],
            "Cannot delete course BSCS: it has 1 enrolled student(s) and 1 subject(s). Use force delete to remove them."
        );
        assert!(course::Entity::find_by_id(bscs.id).one(db).await.unwrap().is_some());
    }

    #[tokio::test]
    #[serial]
    async fn force_delete_removes_course_and_unenrolls_students() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        subject::Model::create(db, bscs.id, "CS101", "Intro", 3).await.unwrap();
        let ana = student::Model::create(db, "2024-0001", "Ana", "Reyes", Some(bscs.id))
            .await
            .unwrap();
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "DELETE",
            &format!("/api/courses/{}?force=true", bscs.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["success"], true);

        assert!(course::Entity::find_by_id(bscs.id).one(db).await.unwrap().is_none());
        let ana = student::Entity::find_by_id(ana.id).one(db).await.unwrap().unwrap();
        assert_eq!(ana.course_id, None);

        let (_, logs) = send(
            &app.router,
            "GET",
            "/api/audit-logs?action=DELETE_COURSE",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(logs["data"]["items"][0]["details"]["force"], "Yes");
    }

    #[tokio::test]
    #[serial]
    async fn bulk_delete_skips_courses_with_dependents() {
        let app = make_test_app().await;
        let db = app.state.db();
        let busy = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let empty = course::Model::create(db, "BSIT", "Information Technology", None).await.unwrap();
        subject::Model::create(db, busy.id, "CS101", "Intro", 3).await.unwrap();
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "DELETE",
            "/api/courses/bulk",
            Some(&token),
            Some(json!({ "ids": [busy.id, empty.id], "force": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["deleted_count"], 1);
        assert_eq!(json["data"]["skipped_count"], 1);
        assert_eq!(json["data"]["skipped_codes"], json!(["BSCS"]));
    }

    #[tokio::test]
    #[serial]
    async fn bulk_delete_with_unknown_id_deletes_nothing() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bsit = course::Model::create(db, "BSIT", "Information Technology", None).await.unwrap();
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "DELETE",
            "/api/courses/bulk",
            Some(&token),
            Some(json!({ "ids": [bsit.id, 9999] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(course::Entity::find_by_id(bsit.id).one(db).await.unwrap().is_some());
    }

    #[tokio::test]
    #[serial]
    async fn bulk_delete_requires_ids() {
        let app = make_test_app().await;
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "DELETE",
            "/api/courses/bulk",
            Some(&token),
            Some(json!({ "ids": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Request must include a non-empty list of ids");
    }
}
