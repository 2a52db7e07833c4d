use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Serialize;

/// The latest code a student saved for one question of a submission.
///
/// One row exists per `(submission, assignment_question)` pair; a NULL
/// `assignment_question_id` pairs with NULL. Re-saving overwrites in place
/// (edit-until-submit), it never appends. `test_results` and `run_output`
/// are a denormalized summary of the latest evaluation; the durable
/// per-case audit trail lives in `code_submission_results`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "code_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub assignment_question_id: Option<i64>,
    pub language: String,
    pub code: String,
    pub test_results: Option<Json>,
    pub run_output: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment_submission::Entity",
        from = "Column::SubmissionId",
        to = "super::assignment_submission::Column::Id"
    )]
    Submission,

    #[sea_orm(
        belongs_to = "super::assignment_question::Entity",
        from = "Column::AssignmentQuestionId",
        to = "super::assignment_question::Column::Id"
    )]
    AssignmentQuestion,

    #[sea_orm(has_many = "super::code_submission_result::Entity")]
    Result,
}

impl Related<super::assignment_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::code_submission_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Result.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Finds the row for a `(submission, assignment_question)` pair.
    pub async fn find_for_pair(
        db: &DatabaseConnection,
        submission_id: i64,
        assignment_question_id: Option<i64>,
    ) -> Result<Option<Model>, DbErr> {
        let mut query = Entity::find().filter(Column::SubmissionId.eq(submission_id));
        query = match assignment_question_id {
            Some(aq_id) => query.filter(Column::AssignmentQuestionId.eq(aq_id)),
            None => query.filter(Column::AssignmentQuestionId.is_null()),
        };
        query.one(db).await
    }

    /// Creates or overwrites the code submission for a pair.
    pub async fn upsert(
        db: &DatabaseConnection,
        submission_id: i64,
        assignment_question_id: Option<i64>,
        language: &str,
        code: &str,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        if let Some(existing) =
            Model::find_for_pair(db, submission_id, assignment_question_id).await?
        {
            let mut active: ActiveModel = existing.into();
            active.language = Set(language.to_string());
            active.code = Set(code.to_string());
            active.updated_at = Set(now);
            return active.update(db).await;
        }

        ActiveModel {
            submission_id: Set(submission_id),
            assignment_question_id: Set(assignment_question_id),
            language: Set(language.to_string()),
            code: Set(code.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Overwrites the denormalized evaluation summary fields.
    pub async fn store_summary(
        db: &DatabaseConnection,
        id: i64,
        test_results: Json,
        run_output: Option<String>,
    ) -> Result<Model, DbErr> {
        let existing = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Code submission {id} not found")))?;

        let mut active: ActiveModel = existing.into();
        active.test_results = Set(Some(test_results));
        active.run_output = Set(run_output);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// All code submissions of a parent submission, ascending by id.
    pub async fn for_submission(
        db: &DatabaseConnection,
        submission_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
