use std::collections::{HashMap, HashSet};

use chrono::Utc;
use db::models::{
    grade, student, subject, subject_reservation,
    subject_reservation::ReservationStatus,
    Grade, Student, Subject, SubjectReservation,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::audit_service::{AuditAction, AuditEntity, AuditService};
use crate::context::ServiceContext;
use crate::error::{ServiceError, ServiceResult};
use crate::pagination::{fetch_page, Page};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservation {
    pub student_id: i64,
    pub subject_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkCreateReservations {
    pub student_id: i64,

    #[validate(length(min = 1, message = "At least one subject is required"))]
    pub subject_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationQuery {
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub status: Option<ReservationStatus>,
    /// Include records held from a course the student left.
    #[serde(default)]
    pub include_held: bool,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationWithSubject {
    #[serde(flatten)]
    pub reservation: subject_reservation::Model,
    pub subject: Option<subject::Model>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkReservationDeleteResult {
    pub deleted_count: u64,
    pub grades_removed: u64,
}

/// Creates the Pending grade paired with a reservation unless one already exists.
async fn ensure_pending_grade<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    subject: &subject::Model,
    encoder: i64,
) -> Result<bool, sea_orm::DbErr> {
    let existing = Grade::find()
        .filter(grade::Column::StudentId.eq(student_id))
        .filter(grade::Column::SubjectId.eq(subject.id))
        .filter(grade::Column::CourseId.eq(subject.course_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

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
    .await?;

    Ok(true)
}

/// Removes the grade paired with a reservation, if any. The pair is keyed by the
/// subject's own course, so held records are cleaned up as well.
async fn remove_paired_grade<C: ConnectionTrait>(
    db: &C,
    reservation: &subject_reservation::Model,
    subject: Option<&subject::Model>,
) -> Result<u64, sea_orm::DbErr> {
    let Some(subject) = subject else {
        return Ok(0);
    };

    Ok(Grade::delete_many()
        .filter(grade::Column::StudentId.eq(reservation.student_id))
        .filter(grade::Column::SubjectId.eq(subject.id))
        .filter(grade::Column::CourseId.eq(subject.course_id))
        .exec(db)
        .await?
        .rows_affected)
}

async fn insert_reservation<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    subject_id: i64,
) -> Result<subject_reservation::Model, sea_orm::DbErr> {
    let now = Utc::now();
    subject_reservation::ActiveModel {
        student_id: Set(student_id),
        subject_id: Set(subject_id),
        status: Set(ReservationStatus::Reserved),
        is_active: Set(true),
        reserved_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn find_student<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<student::Model> {
    Student::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student"))
}

fn enrolled_course(student: &student::Model) -> ServiceResult<i64> {
    student
        .course_id
        .ok_or_else(|| ServiceError::Validation("Student not enrolled in a course".into()))
}

pub struct ReservationService;

impl ReservationService {
    /// Reserves a subject of the student's current course and creates its Pending
    /// grade in the same transaction.
    pub async fn create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: CreateReservation,
    ) -> ServiceResult<ReservationWithSubject> {
        let txn = db.begin().await?;

        let student = find_student(&txn, params.student_id).await?;
        let course_id = enrolled_course(&student)?;

        let subject = Subject::find_by_id(params.subject_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject"))?;
        if subject.course_id != course_id {
            return Err(ServiceError::Validation(
                "Cannot reserve subject from a different course".into(),
            ));
        }

        let duplicate = SubjectReservation::find()
            .filter(subject_reservation::Column::StudentId.eq(student.id))
            .filter(subject_reservation::Column::SubjectId.eq(subject.id))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("Subject already reserved".into()));
        }

        let reservation = insert_reservation(&txn, student.id, subject.id).await?;
        ensure_pending_grade(&txn, student.id, &subject, ctx.encoder()).await?;

        txn.commit().await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::CreateReservation,
            AuditEntity::Reservation,
            Some(reservation.id),
            Some(json!({
                "student_number": student.student_number,
                "subject_code": subject.code,
            })),
        )
        .await;

        Ok(ReservationWithSubject {
            reservation,
            subject: Some(subject),
        })
    }

    /// Reserves every requested subject that belongs to the student's course and
    /// is not reserved yet. Returns only the new reservations; an empty result is
    /// not an error.
    pub async fn bulk_create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: BulkCreateReservations,
    ) -> ServiceResult<Vec<ReservationWithSubject>> {
        params.validate()?;

        let txn = db.begin().await?;

        let student = find_student(&txn, params.student_id).await?;
        let course_id = enrolled_course(&student)?;

        let requested: Vec<i64> = crate::cascade::dedupe_ids(&params.subject_ids);
        let subjects = Subject::find()
            .filter(subject::Column::Id.is_in(requested))
            .filter(subject::Column::CourseId.eq(course_id))
            .order_by_asc(subject::Column::Id)
            .all(&txn)
            .await?;

        let already_reserved: HashSet<i64> = SubjectReservation::find()
            .filter(subject_reservation::Column::StudentId.eq(student.id))
            .filter(
                subject_reservation::Column::SubjectId
                    .is_in(subjects.iter().map(|s| s.id).collect::<Vec<_>>()),
            )
            .all(&txn)
            .await?
            .into_iter()
            .map(|r| r.subject_id)
            .collect();

        let mut created = Vec::new();
        for subject in subjects {
            if already_reserved.contains(&subject.id) {
                continue;
            }
            let reservation = insert_reservation(&txn, student.id, subject.id).await?;
            ensure_pending_grade(&txn, student.id, &subject, ctx.encoder()).await?;
            created.push(ReservationWithSubject {
                reservation,
                subject: Some(subject),
            });
        }

        txn.commit().await?;

        if !created.is_empty() {
            let codes: Vec<&str> = created
                .iter()
                .filter_map(|r| r.subject.as_ref().map(|s| s.code.as_str()))
                .collect();
            AuditService::log(
                db,
                ctx.actor_id,
                AuditAction::BulkCreateReservations,
                AuditEntity::Reservation,
                None,
                Some(json!({
                    "student_number": student.student_number,
                    "subject_codes": codes,
                })),
            )
            .await;
        }

        Ok(created)
    }

    /// Cancels or restores a reservation. The paired grade is left in place.
    pub async fn update_status(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        status: ReservationStatus,
    ) -> ServiceResult<ReservationWithSubject> {
        let reservation = SubjectReservation::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Reservation"))?;
        let subject = Subject::find_by_id(reservation.subject_id).one(db).await?;

        if reservation.status == status {
            return Ok(ReservationWithSubject { reservation, subject });
        }

        let mut active: subject_reservation::ActiveModel = reservation.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        let reservation = active.update(db).await?;

        let student = Student::find_by_id(reservation.student_id).one(db).await?;
        let action = match status {
            ReservationStatus::Cancelled => AuditAction::CancelReservation,
            ReservationStatus::Reserved => AuditAction::RestoreReservation,
        };
        AuditService::log(
            db,
            ctx.actor_id,
            action,
            AuditEntity::Reservation,
            Some(reservation.id),
            Some(json!({
                "student_number": student.map(|s| s.student_number),
                "subject_code": subject.as_ref().map(|s| s.code.clone()),
            })),
        )
        .await;

        Ok(ReservationWithSubject { reservation, subject })
    }

    pub async fn delete(db: &DatabaseConnection, ctx: &ServiceContext, id: i64) -> ServiceResult<()> {
        let txn = db.begin().await?;

        let reservation = SubjectReservation::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Reservation"))?;
        let subject = Subject::find_by_id(reservation.subject_id).one(&txn).await?;
        let student = Student::find_by_id(reservation.student_id).one(&txn).await?;

        let grades_removed = remove_paired_grade(&txn, &reservation, subject.as_ref()).await?;
        reservation.clone().delete(&txn).await?;

        txn.commit().await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::DeleteReservation,
            AuditEntity::Reservation,
            Some(id),
            Some(json!({
                "student_number": student.map(|s| s.student_number),
                "subject_code": subject.map(|s| s.code),
                "grades_removed": grades_removed,
            })),
        )
        .await;

        Ok(())
    }

    /// Deletes the listed reservations and their paired grades. Ids that do not
    /// exist are ignored; the request fails only when none of them exist.
    pub async fn bulk_delete(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        ids: &[i64],
    ) -> ServiceResult<BulkReservationDeleteResult> {
        if ids.is_empty() {
            return Err(ServiceError::Validation("At least one reservation id is required".into()));
        }

        let txn = db.begin().await?;

        let reservations = SubjectReservation::find()
            .filter(subject_reservation::Column::Id.is_in(ids.to_vec()))
            .all(&txn)
            .await?;
        if reservations.is_empty() {
            return Err(ServiceError::not_found("Reservation"));
        }

        let subject_ids: Vec<i64> = reservations.iter().map(|r| r.subject_id).collect();
        let subjects: HashMap<i64, subject::Model> = Subject::find()
            .filter(subject::Column::Id.is_in(subject_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut student_ids: Vec<i64> = reservations.iter().map(|r| r.student_id).collect();
        student_ids.sort_unstable();
        student_ids.dedup();
        let student_numbers: Vec<String> = Student::find()
            .filter(student::Column::Id.is_in(student_ids))
            .order_by_asc(student::Column::StudentNumber)
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.student_number)
            .collect();

        let mut grades_removed = 0;
        for reservation in &reservations {
            grades_removed +=
                remove_paired_grade(&txn, reservation, subjects.get(&reservation.subject_id)).await?;
        }

        let reservation_ids: Vec<i64> = reservations.iter().map(|r| r.id).collect();
        let deleted_count = SubjectReservation::delete_many()
            .filter(subject_reservation::Column::Id.is_in(reservation_ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;

        let codes: Vec<&str> = reservations
            .iter()
            .filter_map(|r| subjects.get(&r.subject_id).map(|s| s.code.as_str()))
            .collect();
        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::BulkDeleteReservations,
            AuditEntity::Reservation,
            None,
            Some(json!({
                "ids": reservation_ids,
                "student_numbers": student_numbers,
                "subject_codes": codes,
                "grades_removed": grades_removed,
            })),
        )
        .await;

        Ok(BulkReservationDeleteResult {
            deleted_count,
            grades_removed,
        })
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<ReservationWithSubject> {
        let (reservation, subject) = SubjectReservation::find_by_id(id)
            .find_also_related(Subject)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Reservation"))?;

        Ok(ReservationWithSubject { reservation, subject })
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        query: &ReservationQuery,
    ) -> ServiceResult<Page<ReservationWithSubject>> {
        let mut select = SubjectReservation::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(subject_reservation::Column::StudentId.eq(student_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(subject_reservation::Column::SubjectId.eq(subject_id));
        }
        if let Some(status) = query.status {
            select = select.filter(subject_reservation::Column::Status.eq(status));
        }
        if !query.include_held {
            select = select.filter(subject_reservation::Column::IsActive.eq(true));
        }
        let select = select.order_by_desc(subject_reservation::Column::ReservedAt);

        let page = fetch_page(db, select, query.page, query.per_page).await?;

        let subject_ids: Vec<i64> = page.items.iter().map(|r| r.subject_id).collect();
        let subjects: HashMap<i64, subject::Model> = Subject::find()
            .filter(subject::Column::Id.is_in(subject_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(page.map(|reservation| ReservationWithSubject {
            subject: subjects.get(&reservation.subject_id).cloned(),
            reservation,
        }))
    }
}
