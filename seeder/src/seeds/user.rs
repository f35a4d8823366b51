use crate::seed::{SeedFuture, Seeder};
use chrono::Utc;
use db::models::user::{self, Role};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use services::ServiceContext;

pub struct UserSeeder;

impl Seeder for UserSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection, ctx: &'a ServiceContext) -> SeedFuture<'a> {
        Box::pin(async move {
            // System account, pinned to the configured actor id
            if user::Entity::find_by_id(ctx.system_actor_id).one(db).await?.is_none() {
                let now = Utc::now();
                user::ActiveModel {
                    id: Set(ctx.system_actor_id),
                    username: Set("admin".into()),
                    email: Set("admin@example.com".into()),
                    password_hash: Set(user::Model::hash_password("password123")?),
                    role: Set(Role::Admin),
                    active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(db)
                .await?;
            }

            // Fixed encoder
            if user::Model::find_by_username(db, "encoder").await?.is_none() {
                user::Model::create(db, "encoder", "encoder@example.com", "password123", Role::Encoder)
                    .await?;
            }

            Ok(())
        })
    }
}
