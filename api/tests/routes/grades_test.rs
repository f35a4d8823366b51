#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send, token_for};
    use axum::http::StatusCode;
    use db::models::{course, student, subject};
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn upsert_computes_final_grade_and_remarks() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let cs101 = subject::Model::create(db, bscs.id, "CS101", "Intro", 3).await.unwrap();
        let ana = student::Model::create(db, "2024-0001", "Ana", "Reyes", Some(bscs.id))
            .await
            .unwrap();
        let token = token_for(&app.encoder);

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/grades/upsert",
            Some(&token),
            Some(json!({
                "student_id": ana.id,
                "subject_id": cs101.id,
                "course_id": bscs.id,
                "prelim": 2.0,
                "midterm": 2.5,
                "finals": 3.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let final_grade = json["data"]["final_grade"].as_f64().unwrap();
        assert!((final_grade - 2.55).abs() < 1e-9);
        assert_eq!(json["data"]["remarks"], "Passed");
        assert_eq!(json["data"]["encoded_by"], app.encoder.id);
        let id = json["data"]["id"].as_i64().unwrap();

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/grades/upsert",
            Some(&token),
            Some(json!({
                "student_id": ana.id,
                "subject_id": cs101.id,
                "course_id": bscs.id,
                "prelim": 85.0,
                "midterm": 85.0,
                "finals": 86.25
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], id);
        assert_eq!(json["data"]["remarks"], "Failed");

        let (status, json) = send(
            &app.router,
            "PUT",
            &format!("/api/grades/{id}"),
            Some(&token),
            Some(json!({ "prelim": 80.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["remarks"], "INC");
        assert_eq!(json["data"]["final_grade"], serde_json::Value::Null);
    }

    #[tokio::test]
    #[serial]
    async fn upsert_rejects_other_course() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let bsit = course::Model::create(db, "BSIT", "Information Technology", None).await.unwrap();
        let it101 = subject::Model::create(db, bsit.id, "IT101", "IT Fundamentals", 3).await.unwrap();
        let cs101 = subject::Model::create(db, bscs.id, "CS101", "Intro", 3).await.unwrap();
        let ana = student::Model::create(db, "2024-0001", "Ana", "Reyes", Some(bscs.id))
            .await
            .unwrap();
        let token = token_for(&app.encoder);

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/grades/upsert",
            Some(&token),
            Some(json!({ "student_id": ana.id, "subject_id": it101.id, "course_id": bsit.id, "prelim": 1.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Student is not enrolled in this course");

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/grades/upsert",
            Some(&token),
            Some(json!({ "student_id": ana.id, "subject_id": it101.id, "course_id": bscs.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Subject does not belong to this course");

        let (status, json) = send(
            &app.router,
            "POST",
            "/api/grades/upsert",
            Some(&token),
            Some(json!({ "student_id": ana.id, "subject_id": cs101.id, "course_id": bscs.id, "finals": 101.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Finals must be between 0 and 100");
    }

    #[tokio::test]
    #[serial]
    async fn list_filters_by_remarks() {
        let app = make_test_app().await;
        let db = app.state.db();
        let bscs = course::Model::create(db, "BSCS", "Computer Science", None).await.unwrap();
        let cs101 = subject::Model::create(db, bscs.id, "CS101", "Intro", 3).await.unwrap();
        let cs102 = subject::Model::create(db, bscs.id, "CS102", "Programming", 3).await.unwrap();
        let ana = student::Model::create(db, "2024-0001", "Ana", "Reyes", Some(bscs.id))
            .await
            .unwrap();
        let token = token_for(&app.encoder);

        for (subject_id, score) in [(cs101.id, 1.5), (cs102.id, 4.0)] {
            let (status, _) = send(
                &app.router,
                "POST",
                "/api/grades",
                Some(&token),
                Some(json!({
                    "student_id": ana.id,
                    "subject_id": subject_id,
                    "prelim": score,
                    "midterm": score,
                    "finals": score
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(
            &app.router,
            "GET",
            &format!("/api/grades?student_id={}&remarks=Passed", ana.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["subject"]["code"], "CS101");
    }
}
