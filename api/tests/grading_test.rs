mod helpers;

use axum::http::StatusCode;
use db::models::assignment::AssignmentType;
use db::models::assignment_submission;
use db::models::user::Role;
use db::test_utils::factory;
use helpers::{send, test_app, token_for};
use judge::test_support::ScriptedExecutor;
use serde_json::json;

async fn seed_submission(
    db: &sea_orm::DatabaseConnection,
    faculty_id: i64,
    student_id: i64,
) -> (db::models::assignment::Model, assignment_submission::Model) {
    let offering = factory::seed_offering(db, faculty_id).await;
    let assignment = factory::seed_assignment(db, offering.id, AssignmentType::Code, false).await;
    let submission = assignment_submission::Model::get_or_create(db, &assignment, student_id)
        .await
        .unwrap();
    (assignment, submission)
}

#[tokio::test]
async fn owning_faculty_grades_and_regrades() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;

    let faculty = factory::seed_user(&db, "f@uni.test", Role::Faculty).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
    let (_, submission) = seed_submission(&db, faculty.id, student.id).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/submissions/grade",
        Some(&token_for(&faculty)),
        Some(json!({"submission_id": submission.id, "score": 88, "feedback": "Good"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["submission"]["final_score"], 88);
    assert_eq!(body["data"]["submission"]["status"], "graded");
    assert_eq!(body["data"]["submission"]["grader_id"], faculty.id);

    // Re-grading overwrites the projection and appends to history.
    let (status, body) = send(
        &app,
        "POST",
        "/api/submissions/grade",
        Some(&token_for(&faculty)),
        Some(json!({"submission_id": submission.id, "score": 92})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["submission"]["final_score"], 92);

    let uri = format!("/api/submissions/{}", submission.id);
    let (_, detail) = send(&app, "GET", &uri, Some(&token_for(&faculty)), None).await;
    assert_eq!(detail["data"]["grades"].as_array().unwrap().len(), 2);
    assert_eq!(detail["data"]["grades"][0]["score"], 88);
    assert_eq!(detail["data"]["grades"][1]["score"], 92);
}

#[tokio::test]
async fn ta_grades_any_offering() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;

    let faculty = factory::seed_user(&db, "f@uni.test", Role::Faculty).await;
    let ta = factory::seed_user(&db, "ta@uni.test", Role::Ta).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
    let (_, submission) = seed_submission(&db, faculty.id, student.id).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/submissions/grade",
        Some(&token_for(&ta)),
        Some(json!({"submission_id": submission.id, "score": 70})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn non_owning_faculty_is_forbidden() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;

    let owner = factory::seed_user(&db, "owner@uni.test", Role::Faculty).await;
    let outsider = factory::seed_user(&db, "other@uni.test", Role::Faculty).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
    let (_, submission) = seed_submission(&db, owner.id, student.id).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/submissions/grade",
        Some(&token_for(&outsider)),
        Some(json!({"submission_id": submission.id, "score": 50})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn students_cannot_reach_the_grade_endpoint() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;

    let faculty = factory::seed_user(&db, "f@uni.test", Role::Faculty).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
    let (_, submission) = seed_submission(&db, faculty.id, student.id).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/submissions/grade",
        Some(&token_for(&student)),
        Some(json!({"submission_id": submission.id, "score": 100})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn score_above_assignment_maximum_is_rejected() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;

    let faculty = factory::seed_user(&db, "f@uni.test", Role::Faculty).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
    let (assignment, submission) = seed_submission(&db, faculty.id, student.id).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/submissions/grade",
        Some(&token_for(&faculty)),
        Some(json!({"submission_id": submission.id, "score": assignment.max_score + 1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn grading_missing_submission_is_not_found() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let admin = factory::seed_user(&db, "a@uni.test", Role::Admin).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/submissions/grade",
        Some(&token_for(&admin)),
        Some(json!({"submission_id": 1234, "score": 10})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn staff_rerun_refreshes_hidden_results() {
    let executor = ScriptedExecutor::new()
        .with_output("2", "4")
        .with_output("3", "9");
    let (app, db) = test_app(executor).await;

    let faculty = factory::seed_user(&db, "f@uni.test", Role::Faculty).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
    let offering = factory::seed_offering(&db, faculty.id).await;
    let assignment = factory::seed_assignment(&db, offering.id, AssignmentType::Code, false).await;
    let question = factory::seed_question(&db, faculty.id).await;
    factory::link_question(&db, assignment.id, question.id, 10).await;
    factory::seed_testcase(&db, question.id, false, Some("2"), Some("4")).await;
    factory::seed_testcase(&db, question.id, false, Some("3"), Some("9")).await;

    let (_, submitted) = send(
        &app,
        "POST",
        "/api/submissions/submit/code",
        Some(&token_for(&student)),
        Some(json!({
            "assignment_id": assignment.id,
            "language": "python",
            "code": "n = int(input())\nprint(n * n)\n",
            "question_id": question.id,
        })),
    )
    .await;
    let submission_id = submitted["data"]["submission"]["id"].as_i64().unwrap();

    let uri = format!("/api/submissions/{submission_id}/evaluate/{}", question.id);
    let (status, body) = send(&app, "POST", &uri, Some(&token_for(&faculty)), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["passed"], 2);

    // Still exactly one result row per hidden case.
    let (_, detail) = send(
        &app,
        "GET",
        &format!("/api/submissions/{submission_id}"),
        Some(&token_for(&faculty)),
        None,
    )
    .await;
    assert_eq!(
        detail["data"]["code"][0]["test_case_results"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}
