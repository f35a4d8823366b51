#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::{course, grade, subject, subject_reservation};
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
    use serde_json::{Value, json};
    use serial_test::serial;

    async fn create_student(app: &crate::helpers::app::TestApp, token: &str, course_id: i64) -> i64 {
        let (status, json) = send(
            &app.router,
            "POST",
            "/api/students",
            Some(token),
            Some(json!({
                "student_number": "2024-0001",
                "first_name": "Ana",
                "last_name": "Reyes",
                "email": "ana@test.com",
                "course_id": course_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["course"]["id"], course_id);
        json["data"]["id"].as_i64().unwrap()
    }

    fn ids(items: &Value) -> Vec<i64> {
        items
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    #[serial]
    async fn create_validates_student_number_format() {
        let app = make_test_app().await;
        let token = token_for(&app.encoder);

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/students",
            Some(&token),
            Some(json!({ "student_number": "24-1", "first_name": "Ana", "last_name": "Reyes" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    #[serial]
    async fn duplicate_student_number_is_conflict() {
        let app = make_test_app().await;
        let bscs = course::Model::create(app.state.db(), "BSCS", "Computer Science", None)
            .await
            .unwrap();
        let token = token_for(&app.encoder);
        create_student(&app, &token, bscs.id).await;

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/students",
            Some(&token),
            Some(json!({ "student_number": "2024-0001", "first_name": "Ben", "last_name": "Cruz" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "Student number already exists");
    }

    #[tokio::test]
    #[serial]
    async fn transfer_round_trip_restores_original_records() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let bsit = course::Model::create(db, "BSIT", "Information Technology", None).await.unwrap();
        let cs101 = subject::Model::create(db, bscs.id, "CS101", "Intro to Computing", 3).await.unwrap();
        let it101 = subject::Model::create(db, bsit.id, "IT101", "IT Fundamentals", 3).await.unwrap();
        let token = token_for(&app.encoder);
        let student_id = create_student(&app, &token, bscs.id).await;

        send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": student_id, "subject_id": cs101.id })),
        )
        .await;

        let uri = format!("/api/students/{student_id}");
        let (_, before) = send(&app.router, "GET", &uri, Some(&token), None).await;
        let reservation_ids = ids(&before["data"]["reservations"]);
        let grade_ids = ids(&before["data"]["grades"]);
        assert_eq!(reservation_ids.len(), 1);
        assert_eq!(grade_ids.len(), 1);

        let (status, moved) = send(
            &app.router,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "course_id": bsit.id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["data"]["course"]["code"], "BSIT");

        let (_, in_bsit) = send(&app.router, "GET", &uri, Some(&token), None).await;
        assert!(in_bsit["data"]["reservations"].as_array().unwrap().is_empty());
        assert!(in_bsit["data"]["grades"].as_array().unwrap().is_empty());

        let (status, _) = send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": student_id, "subject_id": it101.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app.router,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "course_id": bscs.id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, back) = send(&app.router, "GET", &uri, Some(&token), None).await;
        assert_eq!(ids(&back["data"]["reservations"]), reservation_ids);
        assert_eq!(ids(&back["data"]["grades"]), grade_ids);
        assert_eq!(back["data"]["grades"][0]["is_active"], true);

        let held = subject_reservation::Entity::find()
            .filter(subject_reservation::Column::SubjectId.eq(it101.id))
            .filter(subject_reservation::Column::IsActive.eq(false))
            .count(db)
            .await
            .unwrap();
        assert_eq!(held, 1);

        let (_, logs) = send(
            &app.router,
            "GET",
            "/api/audit-logs?action=TRANSFER_STUDENT",
            Some(&token_for(&app.admin)),
            None,
        )
        .await;
        assert_eq!(logs["data"]["total"], 2);
    }

    #[tokio::test]
    #[serial]
    async fn transfer_to_missing_course_changes_nothing() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let cs101 = subject::Model::create(db, bscs.id, "CS101", "Intro to Computing", 3).await.unwrap();
        let token = token_for(&app.encoder);
        let student_id = create_student(&app, &token, bscs.id).await;
        send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": student_id, "subject_id": cs101.id })),
        )
        .await;

        let (status, _) = send(
            &app.router,
            "PUT",
            &format!("/api/students/{student_id}"),
            Some(&token),
            Some(json!({ "course_id": 9999, "first_name": "Changed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, profile) = send(
            &app.router,
            "GET",
            &format!("/api/students/{student_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(profile["data"]["first_name"], "Ana");
        assert_eq!(profile["data"]["course_id"], bscs.id);
        assert_eq!(profile["data"]["reservations"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn bulk_create_reports_failed_rows() {
        let app = make_test_app().await;
        let token = token_for(&app.encoder);

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/students/bulk",
            Some(&token),
            Some(json!({ "students": [
                { "student_number": "2024-0001", "first_name": "Ana", "last_name": "Reyes" },
                { "student_number": "2024-0001", "first_name": "Ben", "last_name": "Cruz" },
                { "student_number": "2024-0002", "first_name": "Cara", "last_name": "Santos" }
            ] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["created"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["failures"][0]["index"], 1);
        assert_eq!(json["data"]["failures"][0]["student_number"], "2024-0001");
    }

    #[tokio::test]
    #[serial]
    async fn only_admin_deletes_students_and_records_go_with_them() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let cs101 = subject::Model::create(db, bscs.id, "CS101", "Intro to Computing", 3).await.unwrap();
        let encoder_token = token_for(&app.encoder);
        let student_id = create_student(&app, &encoder_token, bscs.id).await;
        send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&encoder_token),
            Some(json!({ "student_id": student_id, "subject_id": cs101.id })),
        )
        .await;
        let uri = format!("/api/students/{student_id}");

        let (status, _) = send(&app.router, "DELETE", &uri, Some(&encoder_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app.router, "DELETE", &uri, Some(&token_for(&app.admin)), None).await;
        assert_eq!(status, StatusCode::OK);

        let grades = grade::Entity::find()
            .filter(grade::Column::StudentId.eq(student_id))
            .count(db)
            .await
            .unwrap();
        assert_eq!(grades, 0);
    }
}
