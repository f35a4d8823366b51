use chrono::Utc;
use common::not_blank;
use db::models::{subject, Course, Subject};
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

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubject {
    pub course_id: i64,

    #[validate(custom(function = "not_blank", message = "Subject code must not be blank"))]
    #[validate(length(min = 1, max = 20, message = "Subject code must be between 1 and 20 characters"))]
    pub code: String,

    #[validate(custom(function = "not_blank", message = "Subject title must not be blank"))]
    #[validate(length(min = 1, max = 200, message = "Subject title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(range(min = 1, max = 12, message = "Units must be between 1 and 12"))]
    pub units: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSubject {
    pub course_id: Option<i64>,

    #[validate(custom(function = "not_blank", message = "Subject code must not be blank"))]
    #[validate(length(min = 1, max = 20, message = "Subject code must be between 1 and 20 characters"))]
    pub code: Option<String>,

    #[validate(custom(function = "not_blank", message = "Subject title must not be blank"))]
    #[validate(length(min = 1, max = 200, message = "Subject title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(range(min = 1, max = 12, message = "Units must be between 1 and 12"))]
    pub units: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectQuery {
    pub course_id: Option<i64>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub struct SubjectService;

impl SubjectService {
    async fn ensure_title_free<C: ConnectionTrait>(
        db: &C,
        course_id: i64,
        title: &str,
        exclude_id: Option<i64>,
    ) -> ServiceResult<()> {
        let mut select = Subject::find()
            .filter(subject::Column::CourseId.eq(course_id))
            .filter(subject::Column::Title.eq(title));
        if let Some(id) = exclude_id {
            select = select.filter(subject::Column::Id.ne(id));
        }

        if select.one(db).await?.is_some() {
            return Err(ServiceError::Conflict(
                "A subject with this title already exists in the course".into(),
            ));
        }
        Ok(())
    }

    pub async fn create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: CreateSubject,
    ) -> ServiceResult<subject::Model> {
        params.validate()?;

        let course = Course::find_by_id(params.course_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course"))?;
        let title = params.title.trim();
        Self::ensure_title_free(db, course.id, title, None).await?;

        let created = subject::Model::create(db, course.id, params.code.trim(), title, params.units).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::CreateSubject,
            AuditEntity::Subject,
            Some(created.id),
            Some(json!({ "code": created.code, "course_code": course.code })),
        )
        .await;

        Ok(created)
    }

    /// Updates a subject. Moving it to another course is refused while
    /// reservations or grades reference it.
    pub async fn update(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        params: UpdateSubject,
    ) -> ServiceResult<subject::Model> {
        params.validate()?;

        let existing = Subject::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject"))?;

        let course_id = params.course_id.unwrap_or(existing.course_id);
        if course_id != existing.course_id {
            if Course::find_by_id(course_id).one(db).await?.is_none() {
                return Err(ServiceError::not_found("Course"));
            }
            if cascade::subject_has_dependents(db, id).await? {
                return Err(ServiceError::PrerequisiteFailed {
                    message: format!(
                        "Cannot move subject {} to another course while it has reservations or grades",
                        existing.code
                    ),
                    code: existing.code,
                });
            }
        }

        let title = params
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or(existing.title.as_str())
            .to_owned();
        if title != existing.title || course_id != existing.course_id {
            Self::ensure_title_free(db, course_id, &title, Some(id)).await?;
        }

        let mut active: subject::ActiveModel = existing.into();
        active.course_id = Set(course_id);
        active.title = Set(title);
        if let Some(code) = params.code {
            active.code = Set(code.trim().to_owned());
        }
        if let Some(units) = params.units {
            active.units = Set(units);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::UpdateSubject,
            AuditEntity::Subject,
            Some(updated.id),
            Some(json!({ "code": updated.code })),
        )
        .await;

        Ok(updated)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<subject::Model> {
        Subject::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject"))
    }

    pub async fn list<C: ConnectionTrait>(db: &C, query: &SubjectQuery) -> ServiceResult<Page<subject::Model>> {
        let mut select = Subject::find();
        if let Some(course_id) = query.course_id {
            select = select.filter(subject::Column::CourseId.eq(course_id));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(subject::Column::Code.contains(term))
                    .add(subject::Column::Title.contains(term)),
            );
        }
        let select = select.order_by_asc(subject::Column::Code);

        Ok(fetch_page(db, select, query.page, query.per_page).await?)
    }

    pub async fn delete(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        force: bool,
    ) -> ServiceResult<()> {
        let txn = db.begin().await?;

        let subject = Subject::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject"))?;

        if !force && cascade::subject_has_dependents(&txn, id).await? {
            return Err(ServiceError::PrerequisiteFailed {
                message: format!(
                    "Cannot delete subject {}: it has reservations or grades. Use force delete to remove them.",
                    subject.code
                ),
                code: subject.code,
            });
        }

        let counts = cascade::delete_subjects(&txn, &[id]).await?;
        txn.commit().await?;

        tracing::info!(subject_id = id, force, ?counts, "Deleted subject");
        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::DeleteSubject,
            AuditEntity::Subject,
            Some(id),
            Some(json!({
                "code": subject.code,
                "force": force_marker(force),
                "cascade": counts,
            })),
        )
        .await;

        Ok(())
    }

    pub async fn bulk_delete(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        ids: &[i64],
        force: bool,
    ) -> ServiceResult<BulkDeleteResult> {
        let ids = cascade::dedupe_ids(ids);
        if ids.is_empty() {
            return Err(ServiceError::Validation("At least one subject id is required".into()));
        }

        let txn = db.begin().await?;

        let found = Subject::find()
            .filter(subject::Column::Id.is_in(ids.clone()))
            .all(&txn)
            .await?;

        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !found.iter().any(|s| s.id == *id))
            .collect();
        if !missing.is_empty() {
            return Err(ServiceError::NotFound(format!("Subjects not found: {missing:?}")));
        }

        let mut deletable = Vec::new();
        let mut skipped_codes = Vec::new();
        for id in &ids {
            let Some(subject) = found.iter().find(|s| s.id == *id) else {
                continue;
            };
            if !force && cascade::subject_has_dependents(&txn, subject.id).await? {
                skipped_codes.push(subject.code.clone());
            } else {
                deletable.push(subject.id);
            }
        }

        let counts = cascade::delete_subjects(&txn, &deletable).await?;
        txn.commit().await?;

        let result = BulkDeleteResult::new(counts.subjects, skipped_codes);

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::BulkDeleteSubjects,
            AuditEntity::Subject,
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
