use axum::{
    Json, Router,
    extract::{Extension, State},
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use util::{config, languages::Language};
use validator::Validate;

use crate::auth::{AuthUser, guards::allow_authenticated};
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::code_question;
use evaluator::run_sample_cases;
use judge::JudgeError;
use sea_orm::EntityTrait;

pub fn judge_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", post(run_code))
        .route_layer(from_fn(allow_authenticated))
        .with_state(app_state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct RunCodeRequest {
    #[validate(length(min = 1, message = "source_code must not be empty"))]
    pub source_code: String,
    pub language: Language,
    pub stdin: Option<String>,
    pub expected_output: Option<String>,
    pub question_id: Option<i64>,
}

/// Error message shown to callers when the judge fails. The upstream body
/// is attached outside production only.
fn judge_failure_message(err: &JudgeError) -> String {
    if config::in_development() {
        format!("Judge execution failed: {err}")
    } else {
        "Judge execution failed".to_string()
    }
}

/// POST /judge
///
/// Runs ad-hoc code through the judge service (authenticated users).
///
/// Without `question_id`, executes once with the given stdin and returns the
/// normalized result; `passed` is present only when `expected_output` was
/// supplied. With `question_id`, runs the question's **sample** test cases
/// and returns one outcome per case. Nothing is persisted either way.
///
/// ### Responses
/// - `200 OK` with the run result(s)
/// - `400 Bad Request` (empty source, unknown language)
/// - `404 Not Found` (unknown question)
/// - `500 Internal Server Error` (judge unreachable or polling timed out)
async fn run_code(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<RunCodeRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(errors.to_string())),
        )
            .into_response();
    }

    tracing::debug!(user_id = claims.sub, language = %req.language, "run code request");

    if let Some(question_id) = req.question_id {
        match code_question::Entity::find_by_id(question_id)
            .one(state.db())
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::<Empty>::error("Question not found")),
                )
                    .into_response();
            }
            Err(err) => {
                tracing::error!(%err, "DB error loading question");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Empty>::error("Database error")),
                )
                    .into_response();
            }
        }

        return match run_sample_cases(
            state.db(),
            state.executor(),
            question_id,
            req.language,
            &req.source_code,
        )
        .await
        {
            Ok(runs) => {
                Json(ApiResponse::success(runs, "Sample cases executed")).into_response()
            }
            Err(err) => {
                tracing::error!(%err, question_id, "sample case run failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Empty>::error("Failed to run sample cases")),
                )
                    .into_response()
            }
        };
    }

    match state
        .executor()
        .execute(
            &req.source_code,
            req.language,
            req.stdin.as_deref().unwrap_or_default(),
            req.expected_output.as_deref(),
        )
        .await
    {
        Ok(result) => Json(ApiResponse::success(result, "Code executed")).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Empty>::error(judge_failure_message(&err))),
        )
            .into_response(),
    }
}
