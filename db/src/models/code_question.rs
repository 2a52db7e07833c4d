use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A reusable coding problem. Test cases hang off
/// `code_question_testcases`; attachment to assignments goes through the
/// `assignment_questions` join.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "code_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub constraints: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Author,

    #[sea_orm(has_many = "super::code_question_testcase::Entity")]
    Testcase,
}

impl Related<super::code_question_testcase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Testcase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
