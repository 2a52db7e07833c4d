use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Serialize;

/// Append-only grade history for a submission.
///
/// A NULL `grader_id` marks a webhook-recorded auto-grade. The parent
/// submission's `{final_score, grader_id, graded_at, status}` fields are a
/// projection of the most recent row here, updated on every insert by
/// [`Model::record`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "submission_grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub grader_id: Option<i64>,
    pub score: i64,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
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
        belongs_to = "super::user::Entity",
        from = "Column::GraderId",
        to = "super::user::Column::Id"
    )]
    Grader,
}

impl Related<super::assignment_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Appends a grade row and refreshes the submission projection.
    ///
    /// Grading is idempotent in effect: re-grading appends another history
    /// row and overwrites the projection, it never edits earlier rows.
    pub async fn record(
        db: &DatabaseConnection,
        submission_id: i64,
        grader_id: Option<i64>,
        score: i64,
        feedback: Option<String>,
    ) -> Result<(Model, super::assignment_submission::Model), DbErr> {
        use super::assignment_submission;

        let submission = assignment_submission::Entity::find_by_id(submission_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("Submission {submission_id} not found"))
            })?;

        let now = Utc::now();
        let grade = ActiveModel {
            submission_id: Set(submission_id),
            grader_id: Set(grader_id),
            score: Set(score),
            feedback: Set(feedback),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let mut active: assignment_submission::ActiveModel = submission.into();
        active.final_score = Set(Some(score));
        active.grader_id = Set(grader_id);
        active.graded_at = Set(Some(now));
        active.status = Set(assignment_submission::SubmissionStatus::Graded);
        active.updated_at = Set(now);
        let updated = active.update(db).await?;

        Ok((grade, updated))
    }

    /// Grade history for a submission, oldest first.
    pub async fn history(
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
