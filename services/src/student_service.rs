use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{NaiveDate, Utc};
use common::not_blank;
use db::models::{
    course, grade, student, subject_reservation, Course, Grade, Student, SubjectReservation,
};
use once_cell::sync::Lazy;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use validator::Validate;

use crate::audit_service::{AuditAction, AuditEntity, AuditService};
use crate::context::ServiceContext;
use crate::error::{ServiceError, ServiceResult};
use crate::grade_service::GradeWithSubject;
use crate::ledger::{self, LedgerChange};
use crate::pagination::{fetch_page, Page};
use crate::reservation_service::ReservationWithSubject;
use crate::serde_helpers::double_option;

lazy_static::lazy_static! {
    static ref STUDENT_NUMBER_REGEX: regex::Regex = regex::Regex::new(r"^\d{4}-\d{4}$").unwrap();
}

/// Serialises course transfers per student.
static STUDENT_LOCKS: Lazy<StdMutex<HashMap<i64, Arc<Mutex<()>>>>> = Lazy::new(Default::default);

fn student_lock(student_id: i64) -> Arc<Mutex<()>> {
    let mut locks = STUDENT_LOCKS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    locks.entry(student_id).or_default().clone()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStudent {
    #[validate(regex(
        path = &*STUDENT_NUMBER_REGEX,
        message = "Student number must be in format YYYY-NNNN"
    ))]
    pub student_number: String,

    #[validate(custom(function = "not_blank", message = "First name must not be blank"))]
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Middle name must be at most 100 characters"))]
    pub middle_name: Option<String>,

    #[validate(custom(function = "not_blank", message = "Last name must not be blank"))]
    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub birth_date: Option<NaiveDate>,

    pub course_id: Option<i64>,
}

/// Partial update. For nullable fields an explicit `null` clears the value;
/// `course_id: null` unenrolls the student.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStudent {
    #[validate(regex(
        path = &*STUDENT_NUMBER_REGEX,
        message = "Student number must be in format YYYY-NNNN"
    ))]
    pub student_number: Option<String>,

    #[validate(custom(function = "not_blank", message = "First name must not be blank"))]
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 100, message = "Middle name must be at most 100 characters"))]
    pub middle_name: Option<Option<String>>,

    #[validate(custom(function = "not_blank", message = "Last name must not be blank"))]
    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub birth_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "double_option")]
    pub course_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
    pub search: Option<String>,
    pub course_id: Option<i64>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentWithCourse {
    #[serde(flatten)]
    pub student: student::Model,
    pub course: Option<course::Model>,
}

/// Student with the records of their current course only.
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    #[serde(flatten)]
    pub student: student::Model,
    pub course: Option<course::Model>,
    pub reservations: Vec<ReservationWithSubject>,
    pub grades: Vec<GradeWithSubject>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkRowFailure {
    pub index: usize,
    pub student_number: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkCreateStudentsResult {
    pub created: Vec<student::Model>,
    pub failures: Vec<BulkRowFailure>,
}

/// Fails when the number or email is taken by a student other than `exclude_id`.
async fn ensure_identity_free<C: ConnectionTrait>(
    db: &C,
    student_number: Option<&str>,
    email: Option<&str>,
    exclude_id: Option<i64>,
) -> ServiceResult<()> {
    if let Some(number) = student_number {
        let mut select = Student::find().filter(student::Column::StudentNumber.eq(number));
        if let Some(id) = exclude_id {
            select = select.filter(student::Column::Id.ne(id));
        }
        if select.one(db).await?.is_some() {
            return Err(ServiceError::Conflict("Student number already exists".into()));
        }
    }

    if let Some(email) = email {
        let mut select = Student::find().filter(student::Column::Email.eq(email));
        if let Some(id) = exclude_id {
            select = select.filter(student::Column::Id.ne(id));
        }
        if select.one(db).await?.is_some() {
            return Err(ServiceError::Conflict("Email already in use".into()));
        }
    }

    Ok(())
}

async fn find_course<C: ConnectionTrait>(db: &C, course_id: Option<i64>) -> ServiceResult<Option<course::Model>> {
    match course_id {
        Some(id) => Course::find_by_id(id)
            .one(db)
            .await?
            .map(Some)
            .ok_or_else(|| ServiceError::not_found("Course")),
        None => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub struct StudentService;

impl StudentService {
    async fn insert<C: ConnectionTrait>(db: &C, params: CreateStudent) -> ServiceResult<StudentWithCourse> {
        params.validate()?;

        let email = non_empty(params.email);
        ensure_identity_free(db, Some(&params.student_number), email.as_deref(), None).await?;
        let course = find_course(db, params.course_id).await?;

        let now = Utc::now();
        let created = student::ActiveModel {
            student_number: Set(params.student_number),
            first_name: Set(params.first_name.trim().to_owned()),
            middle_name: Set(non_empty(params.middle_name)),
            last_name: Set(params.last_name.trim().to_owned()),
            email: Set(email),
            birth_date: Set(params.birth_date),
            course_id: Set(params.course_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(StudentWithCourse {
            student: created,
            course,
        })
    }

    pub async fn create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: CreateStudent,
    ) -> ServiceResult<StudentWithCourse> {
        let created = Self::insert(db, params).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::CreateStudent,
            AuditEntity::Student,
            Some(created.student.id),
            Some(json!({
                "student_number": created.student.student_number,
                "course_code": created.course.as_ref().map(|c| c.code.clone()),
            })),
        )
        .await;

        Ok(created)
    }

    /// Creates each row independently; a failing row is reported and does not stop
    /// the others.
    pub async fn bulk_create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        rows: Vec<CreateStudent>,
    ) -> ServiceResult<BulkCreateStudentsResult> {
        if rows.is_empty() {
            return Err(ServiceError::Validation("At least one student is required".into()));
        }

        let mut result = BulkCreateStudentsResult::default();
        for (index, row) in rows.into_iter().enumerate() {
            let student_number = row.student_number.clone();
            match Self::insert(db, row).await {
                Ok(created) => result.created.push(created.student),
                Err(e) if e.is_internal() => return Err(e),
                Err(e) => result.failures.push(BulkRowFailure {
                    index,
                    student_number,
                    message: e.to_string(),
                }),
            }
        }

        if !result.created.is_empty() {
            AuditService::log(
                db,
                ctx.actor_id,
                AuditAction::BulkCreateStudents,
                AuditEntity::Student,
                None,
                Some(json!({
                    "created": result.created.len(),
                    "failed": result.failures.len(),
                })),
            )
            .await;
        }

        Ok(result)
    }

    /// Applies a profile update. When `course_id` changes the student's records are
    /// moved between the active and held sets in the same transaction: records of
    /// the old course are held, held records of the new course are restored.
    pub async fn update(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        params: UpdateStudent,
    ) -> ServiceResult<StudentWithCourse> {
        params.validate()?;

        let lock = student_lock(id);
        let _guard = lock.lock().await;

        let txn = db.begin().await?;

        let existing = Student::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        let email = params.email.map(non_empty);
        ensure_identity_free(
            &txn,
            params
                .student_number
                .as_deref()
                .filter(|n| *n != existing.student_number),
            email.as_ref().and_then(|e| e.as_deref()),
            Some(id),
        )
        .await?;

        let old_course_id = existing.course_id;
        let new_course_id = params.course_id.unwrap_or(old_course_id);
        let course = find_course(&txn, new_course_id).await?;

        let mut held = LedgerChange::default();
        let mut restored = LedgerChange::default();
        if new_course_id != old_course_id {
            if let Some(old) = old_course_id {
                held = ledger::hold_records_for_course(&txn, id, old).await?;
            }
            if let Some(new) = new_course_id {
                restored = ledger::reactivate_records_for_course(&txn, id, new).await?;
            }
        }

        let mut active: student::ActiveModel = existing.into();
        if let Some(number) = params.student_number {
            active.student_number = Set(number);
        }
        if let Some(first_name) = params.first_name {
            active.first_name = Set(first_name.trim().to_owned());
        }
        if let Some(middle_name) = params.middle_name {
            active.middle_name = Set(non_empty(middle_name));
        }
        if let Some(last_name) = params.last_name {
            active.last_name = Set(last_name.trim().to_owned());
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(birth_date) = params.birth_date {
            active.birth_date = Set(birth_date);
        }
        active.course_id = Set(new_course_id);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await?;

        txn.commit().await?;

        let transferred = new_course_id != old_course_id;
        if transferred {
            tracing::info!(
                student_id = id,
                from = ?old_course_id,
                to = ?new_course_id,
                ?held,
                ?restored,
                "Transferred student"
            );
        }
        AuditService::log(
            db,
            ctx.actor_id,
            if transferred { AuditAction::TransferStudent } else { AuditAction::UpdateStudent },
            AuditEntity::Student,
            Some(id),
            Some(json!({
                "student_number": updated.student_number,
                "from_course_id": old_course_id,
                "to_course_id": new_course_id,
                "held": held,
                "restored": restored,
            })),
        )
        .await;

        Ok(StudentWithCourse {
            student: updated,
            course,
        })
    }

    /// Deletes a student together with all of their grades and reservations.
    pub async fn delete(db: &DatabaseConnection, ctx: &ServiceContext, id: i64) -> ServiceResult<()> {
        let lock = student_lock(id);
        let _guard = lock.lock().await;

        let txn = db.begin().await?;

        let existing = Student::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        let grades = Grade::delete_many()
            .filter(grade::Column::StudentId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let reservations = SubjectReservation::delete_many()
            .filter(subject_reservation::Column::StudentId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        existing.clone().delete(&txn).await?;

        txn.commit().await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::DeleteStudent,
            AuditEntity::Student,
            Some(id),
            Some(json!({
                "student_number": existing.student_number,
                "grades_removed": grades,
                "reservations_removed": reservations,
            })),
        )
        .await;

        Ok(())
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<StudentWithCourse> {
        let (student, course) = Student::find_by_id(id)
            .find_also_related(Course)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        Ok(StudentWithCourse { student, course })
    }

    pub async fn get_profile<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<StudentProfile> {
        let StudentWithCourse { student, course } = Self::get(db, id).await?;

        let reservations = ledger::active_reservations(db, id)
            .await?
            .into_iter()
            .map(|(reservation, subject)| ReservationWithSubject { reservation, subject })
            .collect();
        let grades = ledger::active_grades(db, id)
            .await?
            .into_iter()
            .map(|(grade, subject)| GradeWithSubject { grade, subject })
            .collect();

        Ok(StudentProfile {
            student,
            course,
            reservations,
            grades,
        })
    }

    pub async fn list<C: ConnectionTrait>(db: &C, query: &StudentQuery) -> ServiceResult<Page<student::Model>> {
        let mut select = Student::find();
        if let Some(course_id) = query.course_id {
            select = select.filter(student::Column::CourseId.eq(course_id));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(student::Column::StudentNumber.contains(term))
                    .add(student::Column::FirstName.contains(term))
                    .add(student::Column::LastName.contains(term))
                    .add(student::Column::Email.contains(term)),
            );
        }
        let select = select
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName);

        Ok(fetch_page(db, select, query.page, query.per_page).await?)
    }
}
