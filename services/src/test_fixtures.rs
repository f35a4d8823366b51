use std::path::Path;

use chrono::Utc;
use db::models::{
    audit_log, course, grade, student, subject, subject_reservation,
    user::{self, Role},
    AuditLog,
};
use db::test_utils::{setup_file_test_db, setup_test_db};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::audit_service::AuditAction;
use crate::context::ServiceContext;

pub struct Fixture {
    pub db: DatabaseConnection,
    pub admin: user::Model,
    pub ctx: ServiceContext,
}

/// Migrated in-memory database with an admin that doubles as the system actor.
pub async fn setup() -> Fixture {
    with_admin(setup_test_db().await).await
}

/// Same as [`setup`] but backed by a SQLite file, so the pool holds real
/// concurrent connections.
pub async fn setup_on_file(path: &Path) -> Fixture {
    with_admin(setup_file_test_db(path).await).await
}

async fn with_admin(db: DatabaseConnection) -> Fixture {
    let admin = user::Model::create(&db, "admin", "admin@test.com", "password123", Role::Admin)
        .await
        .expect("create admin");
    let ctx = ServiceContext::new(Some(admin.id), admin.id);

    Fixture { db, admin, ctx }
}

pub async fn seed_course(db: &DatabaseConnection, code: &str) -> course::Model {
    course::Model::create(db, code, &format!("{code} programme"), None)
        .await
        .expect("create course")
}

pub async fn seed_subject(db: &DatabaseConnection, course_id: i64, code: &str) -> subject::Model {
    subject::Model::create(db, course_id, code, &format!("{code} title"), 3)
        .await
        .expect("create subject")
}

pub async fn seed_student(
    db: &DatabaseConnection,
    number: &str,
    course_id: Option<i64>,
) -> student::Model {
    student::Model::create(db, number, "Juan", "Dela Cruz", course_id)
        .await
        .expect("create student")
}

pub async fn seed_reservation(
    db: &DatabaseConnection,
    student_id: i64,
    subject: &subject::Model,
) -> subject_reservation::Model {
    let now = Utc::now();
    subject_reservation::ActiveModel {
        student_id: Set(student_id),
        subject_id: Set(subject.id),
        status: Set(subject_reservation::ReservationStatus::Reserved),
        is_active: Set(true),
        reserved_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("create reservation")
}

pub async fn seed_grade(
    db: &DatabaseConnection,
    student_id: i64,
    subject: &subject::Model,
    encoder: i64,
) -> grade::Model {
    let now = Utc::now();
    grade::ActiveModel {
        student_id: Set(student_id),
        subject_id: Set(subject.id),
        course_id: Set(subject.course_id),
        prelim: Set(None),
        midterm: Set(None),
        finals: Set(None),
        final_grade: Set(None),
        remarks: Set(grade::Remarks::Pending),
        is_active: Set(true),
        encoded_by: Set(Some(encoder)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("create grade")
}

/// Details of the newest audit entry recorded for `action`.
pub async fn latest_audit_details(db: &DatabaseConnection, action: AuditAction) -> serde_json::Value {
    AuditLog::find()
        .filter(audit_log::Column::Action.eq(action.as_str()))
        .order_by_desc(audit_log::Column::Id)
        .one(db)
        .await
        .expect("query audit log")
        .and_then(|entry| entry.details)
        .expect("audit entry with details")
}
