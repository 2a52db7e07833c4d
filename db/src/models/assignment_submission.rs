use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a submission.
///
/// There is no separate "in review" state: a submission stays `Submitted`
/// until a grade lands or an external grader reports otherwise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "submission_status_enum"
)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Received; no grade yet.
    #[sea_orm(string_value = "submitted")]
    Submitted,
    /// An external grader reported it as in progress.
    #[sea_orm(string_value = "running")]
    Running,
    /// A grade has been recorded (manual or auto).
    #[sea_orm(string_value = "graded")]
    Graded,
    /// An external grader reported a terminal failure.
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Running => "running",
            SubmissionStatus::Graded => "graded",
            SubmissionStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "running" => Ok(Self::Running),
            "graded" => Ok(Self::Graded),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// One numbered try at an assignment by one student.
///
/// Identity is `(assignment_id, student_id, attempt)`. `final_score`,
/// `grader_id` and `graded_at` are a projection of the latest
/// `submission_grades` row, refreshed on every grade insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "assignment_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub attempt: i64,
    pub status: SubmissionStatus,
    pub final_score: Option<i64>,
    pub grader_id: Option<i64>,
    pub graded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,

    #[sea_orm(has_many = "super::code_submission::Entity")]
    CodeSubmission,

    #[sea_orm(has_many = "super::submission_grade::Entity")]
    Grade,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::code_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CodeSubmission.def()
    }
}

impl Related<super::submission_grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Resolves the submission row a student's save/submit lands on.
    ///
    /// Single-submission assignments reuse the existing row (touching
    /// `updated_at`); multi-submission assignments always open a new row
    /// with `attempt = max(existing) + 1`.
    pub async fn get_or_create(
        db: &DatabaseConnection,
        assignment: &super::assignment::Model,
        student_id: i64,
    ) -> Result<Model, DbErr> {
        let latest = Entity::find()
            .filter(Column::AssignmentId.eq(assignment.id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Attempt)
            .one(db)
            .await?;

        if !assignment.allow_multiple_submissions {
            if let Some(existing) = latest {
                let mut active: ActiveModel = existing.into();
                active.updated_at = Set(Utc::now());
                return active.update(db).await;
            }
        }

        let attempt = latest.map(|s| s.attempt + 1).unwrap_or(1);
        let now = Utc::now();
        ActiveModel {
            assignment_id: Set(assignment.id),
            student_id: Set(student_id),
            attempt: Set(attempt),
            status: Set(SubmissionStatus::Submitted),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Status-only update, used by the grader webhook when no score is
    /// supplied.
    pub async fn set_status(
        db: &DatabaseConnection,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<Model, DbErr> {
        let submission = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Submission {id} not found")))?;

        let mut active: ActiveModel = submission.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{factory, setup_test_db};
    use crate::models::assignment::AssignmentType;

    #[tokio::test]
    async fn single_submission_assignment_reuses_the_row() {
        let db = setup_test_db().await;
        let faculty = factory::seed_user(&db, "f@uni.test", crate::models::user::Role::Faculty).await;
        let student = factory::seed_user(&db, "s@uni.test", crate::models::user::Role::Student).await;
        let offering = factory::seed_offering(&db, faculty.id).await;
        let assignment =
            factory::seed_assignment(&db, offering.id, AssignmentType::Code, false).await;

        let first = Model::get_or_create(&db, &assignment, student.id).await.unwrap();
        let second = Model::get_or_create(&db, &assignment, student.id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.attempt, 1);
    }

    #[tokio::test]
    async fn multi_submission_assignment_increments_attempt() {
        let db = setup_test_db().await;
        let faculty = factory::seed_user(&db, "f@uni.test", crate::models::user::Role::Faculty).await;
        let student = factory::seed_user(&db, "s@uni.test", crate::models::user::Role::Student).await;
        let offering = factory::seed_offering(&db, faculty.id).await;
        let assignment =
            factory::seed_assignment(&db, offering.id, AssignmentType::Code, true).await;

        let first = Model::get_or_create(&db, &assignment, student.id).await.unwrap();
        let second = Model::get_or_create(&db, &assignment, student.id).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.attempt, 1);
        assert_eq!(second.attempt, 2);
    }

    #[tokio::test]
    async fn set_status_updates_only_status() {
        let db = setup_test_db().await;
        let faculty = factory::seed_user(&db, "f@uni.test", crate::models::user::Role::Faculty).await;
        let student = factory::seed_user(&db, "s@uni.test", crate::models::user::Role::Student).await;
        let offering = factory::seed_offering(&db, faculty.id).await;
        let assignment =
            factory::seed_assignment(&db, offering.id, AssignmentType::Code, false).await;

        let submission = Model::get_or_create(&db, &assignment, student.id).await.unwrap();
        let updated = Model::set_status(&db, submission.id, SubmissionStatus::Running)
            .await
            .unwrap();

        assert_eq!(updated.status, SubmissionStatus::Running);
        assert_eq!(updated.final_score, None);
        assert!(updated.graded_at.is_none());
    }
}
