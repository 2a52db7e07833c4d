use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use util::languages::Language;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::{
    assignment::{self, AssignmentType},
    assignment_question, assignment_submission, code_submission,
    user::Role,
};
use evaluator::evaluate_hidden_cases;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitCodeRequest {
    pub assignment_id: i64,
    pub language: Language,
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub code: String,
    pub question_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitCodeResponse {
    pub submission: assignment_submission::Model,
    pub code_submission: code_submission::Model,
    pub test_results: Option<serde_json::Value>,
}

/// POST /submissions/submit/code
///
/// Saves (or re-saves) a student's code for an assignment and, when the code
/// targets a question attached to that assignment, runs the question's
/// hidden test cases.
///
/// Attempt numbering follows the assignment's multiple-submission policy:
/// single-submission assignments reuse the student's row, otherwise a new
/// attempt is opened. Re-saving the same question overwrites the stored
/// code in place.
///
/// The call returns `200 OK` even when some hidden cases failed to execute;
/// those cases are recorded as failed in the results.
///
/// ### Request body
/// ```json
/// { "assignment_id": 1, "language": "python", "code": "...", "question_id": 2 }
/// ```
///
/// ### Responses
/// - `200 OK` with `{submission, code_submission, test_results}`
/// - `400 Bad Request` (empty code, unknown language, non-code assignment)
/// - `403 Forbidden` (caller is not a student)
/// - `404 Not Found` (assignment missing, question not attached)
pub async fn submit_code(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<SubmitCodeRequest>,
) -> impl IntoResponse {
    if claims.role != Role::Student {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error("Only students submit assignments")),
        )
            .into_response();
    }

    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(errors.to_string())),
        )
            .into_response();
    }

    let db = state.db();

    let assignment = match assignment::Entity::find_by_id(req.assignment_id).one(db).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Assignment not found")),
            )
                .into_response();
        }
        Err(err) => {
            tracing::error!(%err, "DB error loading assignment");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            )
                .into_response();
        }
    };

    if assignment.assignment_type != AssignmentType::Code {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(
                "Assignment does not accept code submissions",
            )),
        )
            .into_response();
    }

    // The question, when given, must be attached to this assignment.
    let link = match req.question_id {
        Some(question_id) => {
            match assignment_question::Model::find_link(db, assignment.id, question_id).await {
                Ok(Some(link)) => Some(link),
                Ok(None) => {
                    return (
                        StatusCode::NOT_FOUND,
                        Json(ApiResponse::<Empty>::error(
                            "Question is not part of this assignment",
                        )),
                    )
                        .into_response();
                }
                Err(err) => {
                    tracing::error!(%err, "DB error resolving assignment question");
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ApiResponse::<Empty>::error("Database error")),
                    )
                        .into_response();
                }
            }
        }
        None => None,
    };

    let submission =
        match assignment_submission::Model::get_or_create(db, &assignment, claims.sub).await {
            Ok(s) => s,
            Err(err) => {
                tracing::error!(%err, "DB error creating submission");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Empty>::error("Failed to create submission")),
                )
                    .into_response();
            }
        };

    let code_sub = match code_submission::Model::upsert(
        db,
        submission.id,
        link.as_ref().map(|l| l.id),
        req.language.as_str(),
        &req.code,
    )
    .await
    {
        Ok(cs) => cs,
        Err(err) => {
            tracing::error!(%err, "DB error saving code submission");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to save code")),
            )
                .into_response();
        }
    };

    let mut test_results = None;
    if let Some(link) = &link {
        match evaluate_hidden_cases(db, state.executor(), &code_sub, link.question_id).await {
            Ok(summary) => test_results = Some(summary.to_json()),
            Err(err) => {
                tracing::error!(%err, code_submission_id = code_sub.id, "hidden evaluation failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Empty>::error("Failed to evaluate submission")),
                )
                    .into_response();
            }
        }
    }

    // Re-read so the response reflects the stored summary fields.
    let code_sub = match code_submission::Entity::find_by_id(code_sub.id).one(db).await {
        Ok(Some(cs)) => cs,
        _ => code_sub,
    };

    Json(ApiResponse::success(
        SubmitCodeResponse {
            submission,
            code_submission: code_sub,
            test_results,
        },
        "Code submitted",
    ))
    .into_response()
}
