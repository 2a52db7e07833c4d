pub mod m202508010001_create_users;
pub mod m202508010002_create_course_offerings;
pub mod m202508010003_create_assignments;
pub mod m202508010004_create_code_questions;
pub mod m202508010005_create_code_question_testcases;
pub mod m202508010006_create_assignment_questions;
pub mod m202508010007_create_assignment_submissions;
pub mod m202508010008_create_code_submissions;
pub mod m202508010009_create_code_submission_results;
pub mod m202508010010_create_submission_grades;
