use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of artifact an assignment accepts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "assignment_type_enum"
)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    #[sea_orm(string_value = "file")]
    File,
    #[sea_orm(string_value = "code")]
    Code,
    #[sea_orm(string_value = "link")]
    Link,
    #[sea_orm(string_value = "quiz")]
    Quiz,
}

/// A gradable unit of work tied to a course offering.
///
/// `allow_multiple_submissions` controls attempt numbering: when false, a
/// resubmission reuses the student's existing row instead of creating a new
/// attempt.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_offering_id: i64,
    pub title: String,
    pub assignment_type: AssignmentType,
    pub max_score: i64,
    pub allow_multiple_submissions: bool,
    pub release_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_offering::Entity",
        from = "Column::CourseOfferingId",
        to = "super::course_offering::Column::Id"
    )]
    CourseOffering,

    #[sea_orm(has_many = "super::assignment_submission::Entity")]
    AssignmentSubmission,

    #[sea_orm(has_many = "super::assignment_question::Entity")]
    AssignmentQuestion,
}

impl Related<super::course_offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseOffering.def()
    }
}

impl Related<super::assignment_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentSubmission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
