//! Dependent lookups and ordered cascades shared by course and subject deletion.
//!
//! Children always go before parents: grades, then reservations, then subjects.

use chrono::Utc;
use db::models::{
    course, grade, student, subject, subject_reservation, Course, Grade, Student, Subject,
    SubjectReservation,
};
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

/// Outcome of a bulk delete. Every requested id lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDeleteResult {
    pub deleted_count: u64,
    pub skipped_count: u64,
    pub skipped_codes: Vec<String>,
}

impl BulkDeleteResult {
    pub fn new(deleted_count: u64, skipped_codes: Vec<String>) -> Self {
        Self {
            deleted_count,
            skipped_count: skipped_codes.len() as u64,
            skipped_codes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeCounts {
    pub grades: u64,
    pub reservations: u64,
    pub subjects: u64,
    pub detached_students: u64,
    pub courses: u64,
}

/// Requested ids with duplicates removed, first occurrence order kept.
pub fn dedupe_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

pub async fn subject_has_dependents<C: ConnectionTrait>(db: &C, subject_id: i64) -> Result<bool, DbErr> {
    let reservations = SubjectReservation::find()
        .filter(subject_reservation::Column::SubjectId.eq(subject_id))
        .count(db)
        .await?;
    if reservations > 0 {
        return Ok(true);
    }

    let grades = Grade::find()
        .filter(grade::Column::SubjectId.eq(subject_id))
        .count(db)
        .await?;
    Ok(grades > 0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseDependents {
    pub students: u64,
    pub subjects: u64,
}

impl CourseDependents {
    pub fn any(&self) -> bool {
        self.students > 0 || self.subjects > 0
    }
}

pub async fn course_dependents<C: ConnectionTrait>(db: &C, course_id: i64) -> Result<CourseDependents, DbErr> {
    let students = Student::find()
        .filter(student::Column::CourseId.eq(course_id))
        .count(db)
        .await?;
    let subjects = Subject::find()
        .filter(subject::Column::CourseId.eq(course_id))
        .count(db)
        .await?;

    Ok(CourseDependents { students, subjects })
}

/// Deletes the subjects with their grades and reservations.
pub async fn delete_subjects<C: ConnectionTrait>(db: &C, subject_ids: &[i64]) -> Result<CascadeCounts, DbErr> {
    if subject_ids.is_empty() {
        return Ok(CascadeCounts::default());
    }

    let grades = Grade::delete_many()
        .filter(grade::Column::SubjectId.is_in(subject_ids.to_vec()))
        .exec(db)
        .await?
        .rows_affected;

    let reservations = SubjectReservation::delete_many()
        .filter(subject_reservation::Column::SubjectId.is_in(subject_ids.to_vec()))
        .exec(db)
        .await?
        .rows_affected;

    let subjects = Subject::delete_many()
        .filter(subject::Column::Id.is_in(subject_ids.to_vec()))
        .exec(db)
        .await?
        .rows_affected;

    Ok(CascadeCounts {
        grades,
        reservations,
        subjects,
        ..Default::default()
    })
}

/// Deletes the courses, their subjects and every grade or reservation hanging off
/// them, and unenrolls students pointing at them.
pub async fn delete_courses<C: ConnectionTrait>(db: &C, course_ids: &[i64]) -> Result<CascadeCounts, DbErr> {
    if course_ids.is_empty() {
        return Ok(CascadeCounts::default());
    }

    let subject_ids: Vec<i64> = Subject::find()
        .filter(subject::Column::CourseId.is_in(course_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let grades = Grade::delete_many()
        .filter(
            Condition::any()
                .add(grade::Column::SubjectId.is_in(subject_ids.clone()))
                .add(grade::Column::CourseId.is_in(course_ids.to_vec())),
        )
        .exec(db)
        .await?
        .rows_affected;

    let mut counts = delete_subjects(db, &subject_ids).await?;
    counts.grades += grades;

    counts.detached_students = Student::update_many()
        .col_expr(student::Column::CourseId, Expr::value(Option::<i64>::None))
        .col_expr(student::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(student::Column::CourseId.is_in(course_ids.to_vec()))
        .exec(db)
        .await?
        .rows_affected;

    counts.courses = Course::delete_many()
        .filter(course::Column::Id.is_in(course_ids.to_vec()))
        .exec(db)
        .await?
        .rows_affected;

    Ok(counts)
}
