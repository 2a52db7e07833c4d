mod helpers;

use axum::http::StatusCode;
use db::models::user::Role;
use db::test_utils::factory;
use helpers::{send, test_app, token_for};
use judge::test_support::ScriptedExecutor;
use serde_json::json;

#[tokio::test]
async fn health_check_is_public() {
    let (app, _db) = test_app(ScriptedExecutor::new()).await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "OK");
}

#[tokio::test]
async fn unknown_route_returns_json_not_found() {
    let (app, _db) = test_app(ScriptedExecutor::new()).await;

    let (status, body) = send(&app, "GET", "/api/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn run_code_requires_authentication() {
    let (app, _db) = test_app(ScriptedExecutor::new()).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/judge",
        None,
        Some(json!({"source_code": "print(1)", "language": "python"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn single_run_reports_passed_against_expected_output() {
    let executor = ScriptedExecutor::new().with_output("5", "25");
    let (app, db) = test_app(executor).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/judge",
        Some(&token_for(&student)),
        Some(json!({
            "source_code": "n = int(input())\nprint(n * n)\n",
            "language": "python",
            "stdin": "5",
            "expected_output": "25\n",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["passed"], true);
    assert_eq!(body["data"]["stdout"], "25");
}

#[tokio::test]
async fn single_run_without_expectation_has_no_verdict() {
    let executor = ScriptedExecutor::new().with_output("", "hello");
    let (app, db) = test_app(executor).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/judge",
        Some(&token_for(&student)),
        Some(json!({"source_code": "print('hello')", "language": "python"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["passed"], serde_json::Value::Null);
}

#[tokio::test]
async fn unsupported_language_is_rejected_client_side() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/judge",
        Some(&token_for(&student)),
        Some(json!({"source_code": "x", "language": "cobol"})),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn empty_source_is_a_validation_error() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/judge",
        Some(&token_for(&student)),
        Some(json!({"source_code": "", "language": "python"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn question_mode_runs_sample_cases_only() {
    let executor = ScriptedExecutor::new().with_output("2", "4");
    let (app, db) = test_app(executor).await;

    let faculty = factory::seed_user(&db, "f@uni.test", Role::Faculty).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;
    let question = factory::seed_question(&db, faculty.id).await;
    factory::seed_testcase(&db, question.id, true, Some("2"), Some("4")).await;
    factory::seed_testcase(&db, question.id, false, Some("3"), Some("9")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/judge",
        Some(&token_for(&student)),
        Some(json!({
            "source_code": "n = int(input())\nprint(n * n)\n",
            "language": "python",
            "question_id": question.id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let runs = body["data"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["stdin"], "2");
    assert_eq!(runs[0]["result"]["passed"], true);
}

#[tokio::test]
async fn question_mode_with_unknown_question_is_not_found() {
    let (app, db) = test_app(ScriptedExecutor::new()).await;
    let student = factory::seed_user(&db, "s@uni.test", Role::Student).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/judge",
        Some(&token_for(&student)),
        Some(json!({"source_code": "x", "language": "python", "question_id": 777})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
