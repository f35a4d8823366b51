use chrono::Utc;
use db::models::{
    user::{self, Role},
    User,
};
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::audit_service::{AuditAction, AuditEntity, AuditService};
use crate::context::ServiceContext;
use crate::error::{ServiceError, ServiceResult};
use crate::pagination::{fetch_page, Page};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<Role>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub struct UserService;

impl UserService {
    async fn ensure_email_free<C: ConnectionTrait>(db: &C, email: &str, exclude_id: Option<i64>) -> ServiceResult<()> {
        let mut select = User::find().filter(user::Column::Email.eq(email));
        if let Some(id) = exclude_id {
            select = select.filter(user::Column::Id.ne(id));
        }
        if select.one(db).await?.is_some() {
            return Err(ServiceError::Conflict("A user with this email already exists".into()));
        }
        Ok(())
    }

    pub async fn create(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        params: CreateUser,
    ) -> ServiceResult<user::Model> {
        params.validate()?;

        if user::Model::find_by_username(db, &params.username).await?.is_some() {
            return Err(ServiceError::Conflict("A user with this username already exists".into()));
        }
        Self::ensure_email_free(db, &params.email, None).await?;

        let created = user::Model::create(db, &params.username, &params.email, &params.password, params.role).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::CreateUser,
            AuditEntity::User,
            Some(created.id),
            Some(json!({ "username": created.username, "role": created.role })),
        )
        .await;

        Ok(created)
    }

    /// Updates an account. The system account cannot be demoted or deactivated.
    pub async fn update(
        db: &DatabaseConnection,
        ctx: &ServiceContext,
        id: i64,
        params: UpdateUser,
    ) -> ServiceResult<user::Model> {
        params.validate()?;

        let existing = User::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        if id == ctx.system_actor_id
            && (params.active == Some(false) || params.role.is_some_and(|r| r != Role::Admin))
        {
            return Err(ServiceError::Validation(
                "The system account must remain an active admin".into(),
            ));
        }

        let mut active: user::ActiveModel = existing.into();
        if let Some(email) = params.email {
            Self::ensure_email_free(db, &email, Some(id)).await?;
            active.email = Set(email);
        }
        if let Some(password) = params.password.as_deref() {
            active.password_hash = Set(user::Model::hash_password(password)?);
        }
        if let Some(role) = params.role {
            active.role = Set(role);
        }
        if let Some(is_active) = params.active {
            active.active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::UpdateUser,
            AuditEntity::User,
            Some(updated.id),
            Some(json!({
                "username": updated.username,
                "role": updated.role,
                "active": updated.active,
                "password_changed": params.password.is_some(),
            })),
        )
        .await;

        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, ctx: &ServiceContext, id: i64) -> ServiceResult<()> {
        if id == ctx.system_actor_id {
            return Err(ServiceError::Validation("The system account cannot be deleted".into()));
        }
        if ctx.actor_id == Some(id) {
            return Err(ServiceError::Validation("You cannot delete your own account".into()));
        }

        let existing = User::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;
        let username = existing.username.clone();
        existing.delete(db).await?;

        AuditService::log(
            db,
            ctx.actor_id,
            AuditAction::DeleteUser,
            AuditEntity::User,
            Some(id),
            Some(json!({ "username": username })),
        )
        .await;

        Ok(())
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> ServiceResult<user::Model> {
        User::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    pub async fn list<C: ConnectionTrait>(db: &C, query: &UserQuery) -> ServiceResult<Page<user::Model>> {
        let mut select = User::find();
        if let Some(role) = query.role {
            select = select.filter(user::Column::Role.eq(role));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(user::Column::Username.contains(term))
                    .add(user::Column::Email.contains(term)),
            );
        }
        let select = select.order_by_asc(user::Column::Username);

        Ok(fetch_page(db, select, query.page, query.per_page).await?)
    }

    /// Checks credentials. Unknown users, inactive users and wrong passwords all
    /// yield `None`.
    pub async fn authenticate<C: ConnectionTrait>(
        db: &C,
        username: &str,
        password: &str,
    ) -> ServiceResult<Option<user::Model>> {
        let user = user::Model::find_by_username(db, username).await?;
        Ok(user.filter(|u| u.active && u.verify_password(password)))
    }
}
