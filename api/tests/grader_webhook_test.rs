mod helpers;

use axum::http::StatusCode;
use db::models::assignment::AssignmentType;
use db::models::assignment_submission;
use db::models::user::Role;
use db::test_utils::factory;
use helpers::{send, test_app, token_for};
use judge::test_support::ScriptedExecutor;
use serde_json::json;

async fn seed_submission(db: &sea_orm::DatabaseConnection) -> (i64, db::models::user::Model) {
    let faculty = factory::seed_user(db, "f@uni.test", Role::Faculty).await;
    let student = factory::seed_user(db, "s@uni.test", Role::Student).await;
    let offering = factory::seed_offering(db, faculty.id).await;
    let assignment = factory::seed_assignment(db, offering.id, AssignmentType::Code, false).await;
    let submission = assignment_submission::Model::get_or_create(db, &assignment, student.id)
        .await
        .unwrap();
    (submission.id, faculty)
}

#[tokio::test]
async fn webhook_without_score_updates_status_only() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let (submission_id, faculty) = seed_submission(&db).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/grader/webhook",
        None,
        Some(json!({"submission_id": submission_id, "status": "running"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let uri = format!("/api/submissions/{submission_id}");
    let (_, detail) = send(&app, "GET", &uri, Some(&token_for(&faculty)), None).await;
    assert_eq!(detail["data"]["status"], "running");
    assert_eq!(detail["data"]["final_score"], serde_json::Value::Null);
    assert!(detail["data"]["grades"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_with_score_records_an_auto_grade() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let (submission_id, faculty) = seed_submission(&db).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/grader/webhook",
        None,
        Some(json!({"submission_id": submission_id, "status": "graded", "final_score": 95})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/submissions/{submission_id}");
    let (_, detail) = send(&app, "GET", &uri, Some(&token_for(&faculty)), None).await;
    assert_eq!(detail["data"]["final_score"], 95);
    assert_eq!(detail["data"]["status"], "graded");
    assert_eq!(detail["data"]["grader_id"], serde_json::Value::Null);
    assert_eq!(detail["data"]["grades"][0]["feedback"], "Auto-graded");
    assert_eq!(detail["data"]["grades"][0]["grader_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn unknown_status_string_is_a_validation_error() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let (submission_id, _) = seed_submission(&db).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/grader/webhook",
        None,
        Some(json!({"submission_id": submission_id, "status": "exploded"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_webhook_is_a_validation_error() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let (submission_id, _) = seed_submission(&db).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/grader/webhook",
        None,
        Some(json!({"submission_id": submission_id})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_for_missing_submission_is_not_found() {
    let (app, _db) = test_app(ScriptedExecutor::new()).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/grader/webhook",
        None,
        Some(json!({"submission_id": 424242, "final_score": 10})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
