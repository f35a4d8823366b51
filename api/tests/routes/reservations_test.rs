#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::{course, grade, student, subject};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use serde_json::json;
    use serial_test::serial;

    struct Seeded {
        student: student::Model,
        cs101: subject::Model,
        cs102: subject::Model,
        it101: subject::Model,
    }

    async fn seed(db: &sea_orm::DatabaseConnection) -> Seeded {
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let bsit = course::Model::create(db, "BSIT", "Information Technology", None).await.unwrap();
        Seeded {
            student: student::Model::create(db, "2024-0001", "Ana", "Reyes", Some(bscs.id))
                .await
                .unwrap(),
            cs101: subject::Model::create(db, bscs.id, "CS101", "Intro to Computing", 3).await.unwrap(),
            cs102: subject::Model::create(db, bscs.id, "CS102", "Programming 1", 3).await.unwrap(),
            it101: subject::Model::create(db, bsit.id, "IT101", "IT Fundamentals", 3).await.unwrap(),
        }
    }

    #[tokio::test]
    #[serial]
    async fn create_opens_pending_grade_recorded_by_caller() {
        let app = make_test_app().await;
        let db = app.state.db();
        let data = seed(db).await;
        let token = token_for(&app.encoder);

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": data.student.id, "subject_id": data.cs101.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "reserved");
        assert_eq!(json["data"]["subject"]["code"], "CS101");

        let grade = grade::Entity::find()
            .filter(grade::Column::StudentId.eq(data.student.id))
            .filter(grade::Column::SubjectId.eq(data.cs101.id))
            .one(db)
            .await
            .unwrap()
            .expect("paired grade");
        assert_eq!(grade.remarks, grade::Remarks::Pending);
        assert_eq!(grade.encoded_by, Some(app.encoder.id));
    }

    #[tokio::test]
    #[serial]
    async fn create_rejects_duplicates_and_foreign_subjects() {
        let app = make_test_app().await;
        let data = seed(app.state.db()).await;
        let token = token_for(&app.encoder);
        let body = json!({ "student_id": data.student.id, "subject_id": data.cs101.id });

        send(&app.router, "POST", "/api/reservations", Some(&token), Some(body.clone())).await;
        let (status, json) = send(&app.router, "POST", "/api/reservations", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "Subject already reserved");

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": data.student.id, "subject_id": data.it101.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Cannot reserve subject from a different course");
    }

    #[tokio::test]
    #[serial]
    async fn bulk_create_skips_reserved_and_foreign_subjects() {
        let app = make_test_app().await;
        let data = seed(app.state.db()).await;
        let token = token_for(&app.encoder);

        send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": data.student.id, "subject_id": data.cs101.id })),
        )
        .await;

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/reservations/bulk",
            Some(&token),
            Some(json!({
                "student_id": data.student.id,
                "subject_ids": [data.cs101.id, data.cs102.id, data.it101.id]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = json["data"].as_array().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0]["subject"]["code"], "CS102");
    }

    #[tokio::test]
    #[serial]
    async fn cancel_keeps_grade_and_delete_removes_it() {
        let app = make_test_app().await;
        let db = app.state.db();
        let data = seed(db).await;
        let token = token_for(&app.encoder);

        let (_, json) = send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": data.student.id, "subject_id": data.cs101.id })),
        )
        .await;
        let uri = format!("/api/reservations/{}", json["data"]["id"]);

        let (status, json) = send(
            &app.router,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "cancelled");

        let paired = grade::Entity::find()
            .filter(grade::Column::StudentId.eq(data.student.id))
            .filter(grade::Column::SubjectId.eq(data.cs101.id));
        assert!(paired.clone().one(db).await.unwrap().is_some());

        let (status, _) = send(&app.router, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(paired.one(db).await.unwrap().is_none());

        let (status, _) = send(&app.router, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn bulk_delete_ignores_unknown_ids() {
        let app = make_test_app().await;
        let data = seed(app.state.db()).await;
        let token = token_for(&app.encoder);

        let (_, json) = send(
            &app.router,
            "POST",
            "/api/reservations/bulk",
            Some(&token),
            Some(json!({ "student_id": data.student.id, "subject_ids": [data.cs101.id, data.cs102.id] })),
        )
        .await;
        let mut ids: Vec<i64> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        ids.push(9999);

        let (status, json) = send(
            &app.router,
            "DELETE",
            "/api/reservations/bulk",
            Some(&token),
            Some(json!({ "ids": ids })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["deleted_count"], 2);
        assert_eq!(json["data"]["grades_removed"], 2);

        let (status, _) = send(
            &app.router,
            "DELETE",
            "/api/reservations/bulk",
            Some(&token),
            Some(json!({ "ids": [9999] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
