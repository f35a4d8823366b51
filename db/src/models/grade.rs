use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Grade row for a `(student, subject, course)` triple.
///
/// `final_grade` and `remarks` are derived from the three component scores and
/// are never written from client input directly.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub course_id: i64,
    pub prelim: Option<f64>,
    pub midterm: Option<f64>,
    pub finals: Option<f64>,
    pub final_grade: Option<f64>,
    pub remarks: Remarks,
    pub is_active: bool,
    pub encoded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Remarks {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Passed")]
    Passed,
    #[sea_orm(string_value = "Failed")]
    Failed,
    #[serde(rename = "INC")]
    #[sea_orm(string_value = "INC")]
    Incomplete,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::EncodedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Encoder,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
