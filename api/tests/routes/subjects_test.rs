#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::{course, grade, student, subject};
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn list_filters_by_course() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let bsit = course::Model::create(db, "BSIT", "Information Technology", None).await.unwrap();
        subject::Model::create(db, bscs.id, "CS101", "Intro to Computing", 3).await.unwrap();
        subject::Model::create(db, bscs.id, "CS102", "Programming 1", 3).await.unwrap();
        subject::Model::create(db, bsit.id, "IT101", "IT Fundamentals", 3).await.unwrap();
        let token = token_for(&app.encoder);

        let (status, json) = send(
            &app.router,
            "GET",
            &format!("/api/subjects?course_id={}", bscs.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 2);
    }

    #[tokio::test]
    #[serial]
    async fn create_rejects_duplicate_title_in_course() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        subject::Model::create(db, bscs.id, "CS101", "Intro to Computing", 3).await.unwrap();
        let token = token_for(&app.admin);

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/subjects",
            Some(&token),
            Some(json!({ "course_id": bscs.id, "code": "CS199", "title": "Intro to Computing", "units": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);

        let (status, _) = send(
            &app.router,
            "POST",
            "/api/subjects",
            Some(&token),
            Some(json!({ "course_id": bscs.id, "code": "CS199", "title": "Capstone", "units": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn delete_with_reservations_requires_force() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let cs101 = subject::Model::create(db, bscs.id, "CS101", "Intro", 3).await.unwrap();
        let ana = student::Model::create(db, "2024-0001", "Ana", "Reyes", Some(bscs.id))
            .await
            .unwrap();
        let token = token_for(&app.admin);

        let (status, _) = send(
            &app.router,
            "POST",
            "/api/reservations",
            Some(&token),
            Some(json!({ "student_id": ana.id, "subject_id": cs101.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/api/subjects/{}", cs101.id);
        let (status, json) = send(&app.router, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "PREREQUISITE_FAILED");

        let (status, _) = send(&app.router, "DELETE", &format!("{uri}?force=true"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let grades = grade::Entity::find()
            .filter(grade::Column::SubjectId.eq(cs101.id))
            .count(db)
            .await
            .unwrap();
        assert_eq!(grades, 0);
    }
}
