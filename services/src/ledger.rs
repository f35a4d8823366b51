//! Active/held partition of a student's reservations and grades.
//!
//! A record is active while its subject belongs to the student's current course.
//! Records of a course the student left are held (`is_active = false`) rather than
//! deleted, so moving back restores the same rows.

use chrono::Utc;
use db::models::{
    grade, subject, subject_reservation, Grade, Subject, SubjectReservation,
};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

/// Rows flipped by a ledger operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerChange {
    pub reservations: u64,
    pub grades: u64,
}

/// Marks every active record of `course_id`'s subjects for this student as held.
pub async fn hold_records_for_course<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    course_id: i64,
) -> Result<LedgerChange, DbErr> {
    set_active(db, student_id, course_id, false).await
}

/// Restores every held record of `course_id`'s subjects for this student.
pub async fn reactivate_records_for_course<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    course_id: i64,
) -> Result<LedgerChange, DbErr> {
    set_active(db, student_id, course_id, true).await
}

async fn set_active<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    course_id: i64,
    active: bool,
) -> Result<LedgerChange, DbErr> {
    let subject_ids = subject::Model::ids_for_course(db, course_id).await?;
    if subject_ids.is_empty() {
        return Ok(LedgerChange::default());
    }

    let now = Utc::now();

    let reservations = SubjectReservation::update_many()
        .col_expr(subject_reservation::Column::IsActive, Expr::value(active))
        .col_expr(subject_reservation::Column::UpdatedAt, Expr::value(now))
        .filter(subject_reservation::Column::StudentId.eq(student_id))
        .filter(subject_reservation::Column::SubjectId.is_in(subject_ids.clone()))
        .filter(subject_reservation::Column::IsActive.eq(!active))
        .exec(db)
        .await?
        .rows_affected;

    let grades = Grade::update_many()
        .col_expr(grade::Column::IsActive, Expr::value(active))
        .col_expr(grade::Column::UpdatedAt, Expr::value(now))
        .filter(grade::Column::StudentId.eq(student_id))
        .filter(grade::Column::SubjectId.is_in(subject_ids))
        .filter(grade::Column::IsActive.eq(!active))
        .exec(db)
        .await?
        .rows_affected;

    Ok(LedgerChange {
        reservations,
        grades,
    })
}

/// The student's current reservations with their subjects.
pub async fn active_reservations<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
) -> Result<Vec<(subject_reservation::Model, Option<subject::Model>)>, DbErr> {
    SubjectReservation::find()
        .filter(subject_reservation::Column::StudentId.eq(student_id))
        .filter(subject_reservation::Column::IsActive.eq(true))
        .order_by_asc(subject_reservation::Column::Id)
        .find_also_related(Subject)
        .all(db)
        .await
}

/// The student's current grades with their subjects.
pub async fn active_grades<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
) -> Result<Vec<(grade::Model, Option<subject::Model>)>, DbErr> {
    Grade::find()
        .filter(grade::Column::StudentId.eq(student_id))
        .filter(grade::Column::IsActive.eq(true))
        .order_by_asc(grade::Column::Id)
        .find_also_related(Subject)
        .all(db)
        .await
}
