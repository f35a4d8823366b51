use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub code: String,
    /// Unique within the owning course.
    pub title: String,
    pub units: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        course_id: i64,
        code: &str,
        title: &str,
        units: i32,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            course_id: Set(course_id),
            code: Set(code.to_owned()),
            title: Set(title.to_owned()),
            units: Set(units),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Ids of every subject owned by `course_id`.
    pub async fn ids_for_course<C: ConnectionTrait>(db: &C, course_id: i64) -> Result<Vec<i64>, DbErr> {
        Ok(Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect())
    }
}
