use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Serialize;

/// Durable per-test-case outcome of an evaluation run.
///
/// Unique on `(code_submission_id, code_testcase_id)`: re-running
/// evaluation refreshes the row (including `created_at`), it never
/// duplicates it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "code_submission_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code_submission_id: i64,
    pub code_testcase_id: i64,
    pub passed: bool,
    pub student_output: Option<String>,
    pub error_output: Option<String>,
    pub execution_time_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::code_submission::Entity",
        from = "Column::CodeSubmissionId",
        to = "super::code_submission::Column::Id"
    )]
    CodeSubmission,

    #[sea_orm(
        belongs_to = "super::code_question_testcase::Entity",
        from = "Column::CodeTestcaseId",
        to = "super::code_question_testcase::Column::Id"
    )]
    Testcase,
}

impl Related<super::code_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CodeSubmission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Field bundle for [`Model::upsert`]; mirrors the columns the evaluation
/// loop produces per case.
#[derive(Debug, Clone, Default)]
pub struct CaseOutcome {
    pub passed: bool,
    pub student_output: Option<String>,
    pub error_output: Option<String>,
    pub execution_time_ms: Option<i64>,
}

impl Model {
    /// Inserts or refreshes the result row for a
    /// `(code_submission, testcase)` pair.
    pub async fn upsert(
        db: &DatabaseConnection,
        code_submission_id: i64,
        code_testcase_id: i64,
        outcome: CaseOutcome,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let existing = Entity::find()
            .filter(Column::CodeSubmissionId.eq(code_submission_id))
            .filter(Column::CodeTestcaseId.eq(code_testcase_id))
            .one(db)
            .await?;

        if let Some(row) = existing {
            let mut active: ActiveModel = row.into();
            active.passed = Set(outcome.passed);
            active.student_output = Set(outcome.student_output);
            active.error_output = Set(outcome.error_output);
            active.execution_time_ms = Set(outcome.execution_time_ms);
            active.created_at = Set(now);
            return active.update(db).await;
        }

        ActiveModel {
            code_submission_id: Set(code_submission_id),
            code_testcase_id: Set(code_testcase_id),
            passed: Set(outcome.passed),
            student_output: Set(outcome.student_output),
            error_output: Set(outcome.error_output),
            execution_time_ms: Set(outcome.execution_time_ms),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// All result rows of a code submission, ascending by test case id.
    pub async fn for_code_submission(
        db: &DatabaseConnection,
        code_submission_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CodeSubmissionId.eq(code_submission_id))
            .order_by_asc(Column::CodeTestcaseId)
            .all(db)
            .await
    }
}
