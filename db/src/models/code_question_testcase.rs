use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

/// One test case of a code question.
///
/// Sample cases (`is_sample = true`) are shown to students and drive "Run
/// Code"; hidden cases are used only for evaluation and are never returned
/// by student-facing endpoints. Input/expected values live inline
/// (`*_text`) or as files under the storage root (`*_path`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "code_question_testcases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub question_id: i64,
    pub is_sample: bool,
    pub input_text: Option<String>,
    pub expected_text: Option<String>,
    pub input_path: Option<String>,
    pub expected_path: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::code_question::Entity",
        from = "Column::QuestionId",
        to = "super::code_question::Column::Id"
    )]
    Question,
}

impl Related<super::code_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A case with no inline input and no input file cannot be executed;
    /// hidden evaluation skips it instead of treating it as empty input.
    pub fn is_runnable(&self) -> bool {
        self.input_text.is_some() || self.input_path.is_some()
    }

    /// All test cases for a question, ascending by id.
    pub async fn for_question(
        db: &DatabaseConnection,
        question_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::QuestionId.eq(question_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Hidden (non-sample) cases for a question, ascending by id.
    pub async fn hidden_for_question(
        db: &DatabaseConnection,
        question_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::QuestionId.eq(question_id))
            .filter(Column::IsSample.eq(false))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Sample cases for a question, ascending by id.
    pub async fn samples_for_question(
        db: &DatabaseConnection,
        question_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::QuestionId.eq(question_id))
            .filter(Column::IsSample.eq(true))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
