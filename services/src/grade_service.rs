use std::collections::HashMap;

use chrono::Utc;
use db::models::{
    grade::{self, Remarks},
    subject, Grade, Student, Subject,
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
use crate::grade_calculator::{self, GradeComputation};
use crate::pagination::{fetch_page, Page};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGrade {
    pub student_id: i64,
    pub subject_id: i64,

    #[validate(range(min = 0.0, max = 100.0, message = "Prelim must be between 0 and 100"))]
    pub prelim: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0, message = "Midterm must be between 0 and 100"))]
    pub midterm: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0, message = "Finals must be between 0 and 100"))]
    pub finals: Option<f64>,

    pub remarks: Option<Remarks>,
}

/// Full replacement of a grade's component scores. Absent scores are cleared.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGrade {
    #[validate(range(min = 0.0, max = 100.0, message = "Prelim must be between 0 and 100"))]
    pub prelim: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0, message = "Midterm must be between 0 and 100"))]
    pub midterm: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0, message = "Finals must be between 0 and 100"))]
    pub finals: Option<f64>,

    pub remarks: Option<Remarks>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertGrade {
    pub student_id: i64,
    pub subject_id: i64,
    pub course_id: i64,

    #[validate(range(min = 0.0, max = 100.0, message = "Prelim must be between 0 and 100"))]
    pub prelim: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0, message = "Midterm must be between 0 and 100"))]
    pub midterm: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0, message = "Finals must be between 0 and 100"))]
    pub finals: Option<f64>,

    pub remarks: Option<Remarks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeQuery {
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub course_id: Option<i64>,
    pub remarks: Option<Remarks>,
    #[serde(default)]
    pub include_held: bool,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeWithSubject {
    #[serde(flatten)]
    pub grade: grade::Model,
    pub subject: Option<subject::Model>,
}

struct Scores {
    prelim: Option<f64>,
    midterm: Option<f64>,
    finals: Option<f64>,
    remarks: Option<Remarks>,
}

impl Scores {
    fn computed(&self) -> (GradeComputation, Remarks) {
        let computation = grade_calculator::compute(self.prelim, self.midterm, self.finals);
        let remarks = grade_calculator::resolve_remarks(&computation, self.remarks);
        (computation, remarks)
    }

    /// Writes the scores and the derived final grade and remarks.
    fn apply(&self, active: &mut grade::ActiveModel, encoder: i64) {
        let (computation, remarks) = self.computed();
        active.prelim = Set(self.prelim);
        active.midterm = Set(self.midterm);
        active.finals = Set(self.finals);
        active.final_grade = Set(computation.final_grade);
        active.remarks = Set(remarks);
        active.encoded_by = Set(Some(encoder));
        active.updated_at = Set(Utc::now());
    }
}

fn audit_details(grade: &grade::Model, student_number: Option<&str>, subject_code: Option<&str>) -> serde_json::Value {
    json!({
        "student_number": student_number,
        "subject_code": subject_code,
        "prelim": grade.prelim,
        "midterm": grade.midterm,
        "finals": grade.finals,
        "final_grade": grade.final_grade,
        "remarks": grade.remarks,
    })
}

pub struct GradeService;

impl GradeService {
    /// Creates a grade for a subject of the student's current course.
    pub async fn create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: CreateGrade,
    ) -> ServiceResult<GradeWithSubject> {
        params.validate()?;

        let txn = db.begin().await?;

        let student = Student::find_by_id(params.student_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;
        let subject = Subject::find_by_id(params.subject_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject"))?;
        if student.course_id != Some(subject.course_id) {
            return Err(ServiceError::Validation(
                "Subject does not belong to the student's course".into(),
            ));
        }

        let existing = Grade::find()
            .filter(grade::Column::StudentId.eq(student.id))
            .filter(grade::Column::SubjectId.eq(subject.id))
            .filter(grade::Column::CourseId.eq(subject.course_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "A grade already exists for this student and subject".into(),
            ));
        }

        let mut active = grade::ActiveModel {
            student_id: Set(student.id),
            subject_id: Set(subject.id),
            course_id: Set(subject.course_id),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Scores {
            prelim: params.prelim,
            midterm: params.midterm,
            finals: params.finals,
            remarks: params.remarks,
        }
        .apply(&mut active, ctx.encoder());
        let created = active.insert(&txn).await?;

        txn.commit().await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::CreateGrade,
            AuditEntity::Grade,
            Some(created.id),
            Some(audit_details(&created, Some(&student.student_number), Some(&subject.code))),
        )
        .await;

        Ok(GradeWithSubject {
            grade: created,
            subject: Some(subject),
        })
    }

    /// Replaces the component scores and recomputes the final grade and remarks.
    pub async fn update(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        params: UpdateGrade,
    ) -> ServiceResult<GradeWithSubject> {
        params.validate()?;

        let (existing, subject) = Grade::find_by_id(id)
            .find_also_related(Subject)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Grade"))?;
        let student = Student::find_by_id(existing.student_id).one(db).await?;

        let mut active: grade::ActiveModel = existing.into();
        Scores {
            prelim: params.prelim,
            midterm: params.midterm,
            finals: params.finals,
            remarks: params.remarks,
        }
        .apply(&mut active, ctx.encoder());
        let updated = active.update(db).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::UpdateGrade,
            AuditEntity::Grade,
            Some(updated.id),
            Some(audit_details(
                &updated,
                student.as_ref().map(|s| s.student_number.as_str()),
                subject.as_ref().map(|s| s.code.as_str()),
            )),
        )
        .await;

        Ok(GradeWithSubject {
            grade: updated,
            subject,
        })
    }

    /// Creates or updates the grade for `(student, subject, course)`. Rejected when
    /// the student is not currently enrolled in `course_id`.
    pub async fn upsert(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: UpsertGrade,
    ) -> ServiceResult<GradeWithSubject> {
        params.validate()?;

        let txn = db.begin().await?;

        let student = Student::find_by_id(params.student_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;
        if student.course_id != Some(params.course_id) {
            return Err(ServiceError::Validation(
                "Student is not enrolled in this course".into(),
            ));
        }
        let subject = Subject::find_by_id(params.subject_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject"))?;
        if subject.course_id != params.course_id {
            return Err(ServiceError::Validation(
                "Subject does not belong to this course".into(),
            ));
        }

        let scores = Scores {
            prelim: params.prelim,
            midterm: params.midterm,
            finals: params.finals,
            remarks: params.remarks,
        };

        let existing = Grade::find()
            .filter(grade::Column::StudentId.eq(student.id))
            .filter(grade::Column::SubjectId.eq(subject.id))
            .filter(grade::Column::CourseId.eq(params.course_id))
            .one(&txn)
            .await?;

        let (saved, action) = match existing {
            Some(existing) => {
                let mut active: grade::ActiveModel = existing.into();
                active.is_active = Set(true);
                scores.apply(&mut active, ctx.encoder());
                (active.update(&txn).await?, AuditAction::UpdateGrade)
            }
            None => {
                let mut active = grade::ActiveModel {
                    student_id: Set(student.id),
                    subject_id: Set(subject.id),
                    course_id: Set(params.course_id),
                    is_active: Set(true),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                };
                scores.apply(&mut active, ctx.encoder());
                (active.insert(&txn).await?, AuditAction::CreateGrade)
            }
        };

        txn.commit().await?;

        AuditService::log(
            db,
            ctx.actor_id,
            action,
            AuditEntity::Grade,
            Some(saved.id),
            Some(audit_details(&saved, Some(&student.student_number), Some(&subject.code))),
        )
        .await;

        Ok(GradeWithSubject {
            grade: saved,
            subject: Some(subject),
        })
    }

    pub async fn delete(db: &DatabaseConnection, ctx: &ServiceContext, id: i64) -> ServiceResult<()> {
        let (grade, subject) = Grade::find_by_id(id)
            .find_also_related(Subject)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Grade"))?;
        let student = Student::find_by_id(grade.student_id).one(db).await?;

        grade.clone().delete(db).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::DeleteGrade,
            AuditEntity::Grade,
            Some(id),
            Some(audit_details(
                &grade,
                student.as_ref().map(|s| s.student_number.as_str()),
                subject.as_ref().map(|s| s.code.as_str()),
            )),
        )
        .await;

        Ok(())
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<GradeWithSubject> {
        let (grade, subject) = Grade::find_by_id(id)
            .find_also_related(Subject)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Grade"))?;

        Ok(GradeWithSubject { grade, subject })
    }

    pub async fn list<C: ConnectionTrait>(db: &C, query: &GradeQuery) -> ServiceResult<Page<GradeWithSubject>> {
        let mut select = Grade::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(grade::Column::StudentId.eq(student_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(grade::Column::SubjectId.eq(subject_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(grade::Column::CourseId.eq(course_id));
        }
        if let Some(remarks) = query.remarks {
            select = select.filter(grade::Column::Remarks.eq(remarks));
        }
        if !query.include_held {
            select = select.filter(grade::Column::IsActive.eq(true));
        }
        let select = select.order_by_asc(grade::Column::Id);

        let page = fetch_page(db, select, query.page, query.per_page).await?;

        let subject_ids: Vec<i64> = page.items.iter().map(|g| g.subject_id).collect();
        let subjects: HashMap<i64, subject::Model> = Subject::find()
            .filter(subject::Column::Id.is_in(subject_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(page.map(|grade| GradeWithSubject {
            subject: subjects.get(&grade.subject_id).cloned(),
            grade,
        }))
    }
}
