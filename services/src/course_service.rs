use chrono::Utc;
use common::not_blank;
use db::models::{course, Course};
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::audit_service::{force_marker, AuditAction, AuditEntity, AuditService};
use crate::cascade::{self, BulkDeleteResult};
use crate::context::ServiceContext;
use crate::error::{ServiceError, ServiceResult};
use crate::pagination::{fetch_page, Page};
use crate::serde_helpers::double_option;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(custom(function = "not_blank", message = "Course code must not be blank"))]
    #[validate(length(min = 1, max = 20, message = "Course code must be between 1 and 20 characters"))]
    pub code: String,

    #[validate(custom(function = "not_blank", message = "Course name must not be blank"))]
    #[validate(length(min = 1, max = 200, message = "Course name must be between 1 and 200 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCourse {
    #[validate(custom(function = "not_blank", message = "Course code must not be blank"))]
    #[validate(length(min = 1, max = 20, message = "Course code must be between 1 and 20 characters"))]
    pub code: Option<String>,

    #[validate(custom(function = "not_blank", message = "Course name must not be blank"))]
    #[validate(length(min = 1, max = 200, message = "Course name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub struct CourseService;

impl CourseService {
    pub async fn create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: CreateCourse,
    ) -> ServiceResult<course::Model> {
        params.validate()?;
        let code = params.code.trim();

        if course::Model::find_by_code(db, code).await?.is_some() {
            return Err(ServiceError::Conflict("Course code already exists".into()));
        }

        let created = course::Model::create(db, code, params.name.trim(), params.description.as_deref()).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::CreateCourse,
            AuditEntity::Course,
            Some(created.id),
            Some(json!({ "code": created.code, "name": created.name })),
        )
        .await;

        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        params: UpdateCourse,
    ) -> ServiceResult<course::Model> {
        params.validate()?;

        let existing = Course::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course"))?;

        let mut active: course::ActiveModel = existing.clone().into();

        if let Some(code) = params.code.as_deref().map(str::trim) {
            if code != existing.code {
                if course::Model::find_by_code(db, code).await?.is_some() {
                    return Err(ServiceError::Conflict("Course code already exists".into()));
                }
                active.code = Set(code.to_owned());
            }
        }
        if let Some(name) = params.name {
            active.name = Set(name.trim().to_owned());
        }
        if let Some(description) = params.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::UpdateCourse,
            AuditEntity::Course,
            Some(updated.id),
            Some(json!({ "code": updated.code })),
        )
        .await;

        Ok(updated)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<course::Model> {
        Course::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course"))
    }

    pub async fn list<C: ConnectionTrait>(db: &C, query: &CourseQuery) -> ServiceResult<Page<course::Model>> {
        let mut select = Course::find();
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(course::Column::Code.contains(term))
                    .add(course::Column::Name.contains(term)),
            );
        }
        let select = select.order_by_asc(course::Column::Code);

        Ok(fetch_page(db, select, query.page, query.per_page).await?)
    }

    /// Deletes one course.
    ///
    /// A standard delete is refused while students or subjects reference the course.
    /// A forced delete removes the course's subjects with their grades and
    /// reservations and unenrolls its students, all in one transaction.
    pub async fn delete(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        force: bool,
    ) -> ServiceResult<()> {
        let txn = db.begin().await?;

        let course = Course::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course"))?;

        let counts = if force {
            cascade::delete_courses(&txn, &[id]).await?
        } else {
            let dependents = cascade::course_dependents(&txn, id).await?;
            if dependents.any() {
                return Err(ServiceError::PrerequisiteFailed {
                    message: format!(
                        "Cannot delete course {}: it has {} enrolled student(s) and {} subject(s). Use force delete to remove them.",
                        course.code, dependents.students, dependents.subjects
                    ),
                    code: course.code,
                });
            }
            Course::delete_by_id(id).exec(&txn).await?;
            cascade::CascadeCounts {
                courses: 1,
                ..Default::default()
            }
        };

        txn.commit().await?;

        tracing::info!(course_id = id, force, ?counts, "Deleted course");
        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::DeleteCourse,
            AuditEntity::Course,
            Some(id),
            Some(json!({
                "code": course.code,
                "force": force_marker(force),
                "cascade": counts,
            })),
        )
        .await;

        Ok(())
    }

    /// Deletes several courses.
    ///
    /// Unknown ids fail the whole request before anything is written. Without
    /// `force`, courses with dependents are skipped and reported by code.
    pub async fn bulk_delete(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        ids: &[i64],
        force: bool,
    ) -> ServiceResult<BulkDeleteResult> {
        let ids = cascade::dedupe_ids(ids);
        if ids.is_empty() {
            return Err(ServiceError::Validation("At least one course id is required".into()));
        }

        let txn = db.begin().await?;

        let found = Course::find()
            .filter(course::Column::Id.is_in(ids.clone()))
            .all(&txn)
            .await?;

        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !found.iter().any(|c| c.id == *id))
            .collect();
        if !missing.is_empty() {
            return Err(ServiceError::NotFound(format!("Courses not found: {missing:?}")));
        }

        let result = if force {
            let counts = cascade::delete_courses(&txn, &ids).await?;
            BulkDeleteResult::new(counts.courses, Vec::new())
        } else {
            let mut deletable = Vec::new();
            let mut skipped_codes = Vec::new();
            for id in &ids {
                let Some(course) = found.iter().find(|c| c.id == *id) else {
                    continue;
                };
                if cascade::course_dependents(&txn, course.id).await?.any() {
                    skipped_codes.push(course.code.clone());
                } else {
                    deletable.push(course.id);
                }
            }

            let deleted = if deletable.is_empty() {
                0
            } else {
                Course::delete_many()
                    .filter(course::Column::Id.is_in(deletable))
                    .exec(&txn)
                    .await?
                    .rows_affected
            };
            BulkDeleteResult::new(deleted, skipped_codes)
        };

        txn.commit().await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::BulkDeleteCourses,
            AuditEntity::Course,
            None,
            Some(json!({
                "ids": ids,
                "deleted_count": result.deleted_count,
                "skipped_codes": result.skipped_codes,
                "force": force_marker(force),
            })),
        )
        .await;

        Ok(result)
    }
}
