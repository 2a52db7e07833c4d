use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202508010001_create_users::Migration),
            Box::new(migrations::m202508010002_create_course_offerings::Migration),
            Box::new(migrations::m202508010003_create_assignments::Migration),
            Box::new(migrations::m202508010004_create_code_questions::Migration),
            Box::new(migrations::m202508010005_create_code_question_testcases::Migration),
            Box::new(migrations::m202508010006_create_assignment_questions::Migration),
            Box::new(migrations::m202508010007_create_assignment_submissions::Migration),
            Box::new(migrations::m202508010008_create_code_submissions::Migration),
            Box::new(migrations::m202508010009_create_code_submission_results::Migration),
            Box::new(migrations::m202508010010_create_submission_grades::Migration),
        ]
    }
}
