use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Row factories shared by this crate's tests and by downstream crates'
/// evaluation and API tests.
pub mod factory {
    use crate::models::{
        assignment, assignment_question, code_question, code_question_testcase, course_offering,
        user,
    };
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};

    pub async fn seed_user(
        db: &DatabaseConnection,
        email: &str,
        role: user::Role,
    ) -> user::Model {
        user::ActiveModel {
            email: Set(email.to_string()),
            display_name: Set(email.split('@').next().unwrap_or("user").to_string()),
            role: Set(role),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed user")
    }

    pub async fn seed_offering(
        db: &DatabaseConnection,
        faculty_id: i64,
    ) -> course_offering::Model {
        course_offering::ActiveModel {
            course_code: Set("CS101".to_string()),
            title: Set("Intro to Programming".to_string()),
            term: Set("2025S2".to_string()),
            faculty_id: Set(faculty_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed course offering")
    }

    pub async fn seed_assignment(
        db: &DatabaseConnection,
        course_offering_id: i64,
        assignment_type: assignment::AssignmentType,
        allow_multiple_submissions: bool,
    ) -> assignment::Model {
        let now = Utc::now();
        assignment::ActiveModel {
            course_offering_id: Set(course_offering_id),
            title: Set("Assignment 1".to_string()),
            assignment_type: Set(assignment_type),
            max_score: Set(100),
            allow_multiple_submissions: Set(allow_multiple_submissions),
            release_at: Set(Some(now)),
            due_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed assignment")
    }

    pub async fn seed_question(
        db: &DatabaseConnection,
        created_by: i64,
    ) -> code_question::Model {
        let now = Utc::now();
        code_question::ActiveModel {
            title: Set("Square the input".to_string()),
            description: Set("Read an integer and print its square.".to_string()),
            constraints: Set(None),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed code question")
    }

    pub async fn seed_testcase(
        db: &DatabaseConnection,
        question_id: i64,
        is_sample: bool,
        input_text: Option<&str>,
        expected_text: Option<&str>,
    ) -> code_question_testcase::Model {
        code_question_testcase::ActiveModel {
            question_id: Set(question_id),
            is_sample: Set(is_sample),
            input_text: Set(input_text.map(str::to_string)),
            expected_text: Set(expected_text.map(str::to_string)),
            input_path: Set(None),
            expected_path: Set(None),
            position: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed test case")
    }

    pub async fn link_question(
        db: &DatabaseConnection,
        assignment_id: i64,
        question_id: i64,
        points: i64,
    ) -> assignment_question::Model {
        assignment_question::ActiveModel {
            assignment_id: Set(assignment_id),
            question_id: Set(question_id),
            points: Set(points),
            position: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to link question to assignment")
    }
}
