use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform-wide role carried in JWT claims and stored on the user row.
///
/// `Ta` and `Admin` are global roles; `Faculty` authority is scoped to the
/// course offerings the user owns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_enum")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "ta")]
    Ta,
    #[sea_orm(string_value = "faculty")]
    Faculty,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// True for roles allowed to grade and to re-run hidden test cases.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Ta | Role::Faculty | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Student => "student",
            Role::Ta => "ta",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

/// A platform account. Rows are written by seeds and tests only; the
/// evaluation pipeline reads them for grader identity and ownership checks.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_offering::Entity")]
    CourseOffering,
}

impl Related<super::course_offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseOffering.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
