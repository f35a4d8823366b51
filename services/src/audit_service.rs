use chrono::Utc;
use db::models::{audit_log, AuditLog};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::pagination::{fetch_page, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    CreateUser,
    UpdateUser,
    DeleteUser,
    CreateCourse,
    UpdateCourse,
    DeleteCourse,
    BulkDeleteCourses,
    CreateSubject,
    UpdateSubject,
    DeleteSubject,
    BulkDeleteSubjects,
    CreateStudent,
    BulkCreateStudents,
    UpdateStudent,
    TransferStudent,
    DeleteStudent,
    CreateReservation,
    BulkCreateReservations,
    CancelReservation,
    RestoreReservation,
    DeleteReservation,
    BulkDeleteReservations,
    CreateGrade,
    UpdateGrade,
    DeleteGrade,
    DeleteAuditLog,
    BulkDeleteAuditLogs,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::CreateUser => "CREATE_USER",
            AuditAction::UpdateUser => "UPDATE_USER",
            AuditAction::DeleteUser => "DELETE_USER",
            AuditAction::CreateCourse => "CREATE_COURSE",
            AuditAction::UpdateCourse => "UPDATE_COURSE",
            AuditAction::DeleteCourse => "DELETE_COURSE",
            AuditAction::BulkDeleteCourses => "BULK_DELETE_COURSES",
            AuditAction::CreateSubject => "CREATE_SUBJECT",
            AuditAction::UpdateSubject => "UPDATE_SUBJECT",
            AuditAction::DeleteSubject => "DELETE_SUBJECT",
            AuditAction::BulkDeleteSubjects => "BULK_DELETE_SUBJECTS",
            AuditAction::CreateStudent => "CREATE_STUDENT",
            AuditAction::BulkCreateStudents => "BULK_CREATE_STUDENTS",
            AuditAction::UpdateStudent => "UPDATE_STUDENT",
            AuditAction::TransferStudent => "TRANSFER_STUDENT",
            AuditAction::DeleteStudent => "DELETE_STUDENT",
            AuditAction::CreateReservation => "CREATE_RESERVATION",
            AuditAction::BulkCreateReservations => "BULK_CREATE_RESERVATIONS",
            AuditAction::CancelReservation => "CANCEL_RESERVATION",
            AuditAction::RestoreReservation => "RESTORE_RESERVATION",
            AuditAction::DeleteReservation => "DELETE_RESERVATION",
            AuditAction::BulkDeleteReservations => "BULK_DELETE_RESERVATIONS",
            AuditAction::CreateGrade => "CREATE_GRADE",
            AuditAction::UpdateGrade => "UPDATE_GRADE",
            AuditAction::DeleteGrade => "DELETE_GRADE",
            AuditAction::DeleteAuditLog => "DELETE_AUDIT_LOG",
            AuditAction::BulkDeleteAuditLogs => "BULK_DELETE_AUDIT_LOGS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEntity {
    User,
    Course,
    Subject,
    Student,
    Reservation,
    Grade,
    AuditLog,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntity::User => "user",
            AuditEntity::Course => "course",
            AuditEntity::Subject => "subject",
            AuditEntity::Student => "student",
            AuditEntity::Reservation => "subject_reservation",
            AuditEntity::Grade => "grade",
            AuditEntity::AuditLog => "audit_log",
        }
    }
}

/// `"Yes"` / `"No"` marker recorded on delete entries.
pub fn force_marker(force: bool) -> &'static str {
    if force { "Yes" } else { "No" }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub user_id: Option<i64>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub struct AuditService;

impl AuditService {
    /// Appends an entry. A failed write is logged and swallowed; it never fails
    /// the operation being audited.
    pub async fn log<C: ConnectionTrait>(
        db: &C,
        user_id: Option<i64>,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: Option<i64>,
        details: Option<Value>,
    ) {
        let entry = audit_log::ActiveModel {
            user_id: Set(user_id),
            action: Set(action.as_str().to_owned()),
            entity_type: Set(entity.as_str().to_owned()),
            entity_id: Set(entity_id),
            details: Set(details),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        if let Err(e) = entry.insert(db).await {
            tracing::error!(
                action = action.as_str(),
                entity = entity.as_str(),
                ?entity_id,
                error = %e,
                "Failed to write audit log"
            );
        }
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        query: &AuditLogQuery,
    ) -> ServiceResult<Page<audit_log::Model>> {
        let mut select = AuditLog::find();
        if let Some(user_id) = query.user_id {
            select = select.filter(audit_log::Column::UserId.eq(user_id));
        }
        if let Some(action) = query.action.as_deref().filter(|a| !a.is_empty()) {
            select = select.filter(audit_log::Column::Action.eq(action));
        }
        if let Some(entity_type) = query.entity_type.as_deref().filter(|e| !e.is_empty()) {
            select = select.filter(audit_log::Column::EntityType.eq(entity_type));
        }
        let select = select
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id);

        Ok(fetch_page(db, select, query.page, query.per_page).await?)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, actor_id: Option<i64>, id: i64) -> ServiceResult<()> {
        let result = AuditLog::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Audit log"));
        }

        Self::log(db, actor_id, AuditAction::DeleteAuditLog, AuditEntity::AuditLog, Some(id), None).await;
        Ok(())
    }

    /// Deletes the listed entries and returns how many existed.
    pub async fn bulk_delete<C: ConnectionTrait>(
        db: &C,
        actor_id: Option<i64>,
        ids: &[i64],
    ) -> ServiceResult<u64> {
        if ids.is_empty() {
            return Err(ServiceError::Validation("At least one id is required".into()));
        }

        let deleted = AuditLog::delete_many()
            .filter(audit_log::Column::Id.is_in(ids.to_vec()))
            .exec(db)
            .await?
            .rows_affected;

        Self::log(
            db,
            actor_id,
            AuditAction::BulkDeleteAuditLogs,
            AuditEntity::AuditLog,
            None,
            Some(serde_json::json!({ "ids": ids, "deleted_count": deleted })),
        )
        .await;

        Ok(deleted)
    }
}
