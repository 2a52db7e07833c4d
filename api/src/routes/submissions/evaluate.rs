use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::EntityTrait;

use crate::auth::AuthUser;
use crate::auth::guards::may_grade;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::{assignment, assignment_question, assignment_submission, code_submission};
use evaluator::evaluate_hidden_cases;

/// POST /submissions/{submission_id}/evaluate/{question_id}
///
/// Re-runs the hidden test cases of one question for review. Same
/// orchestrator path as submit-time evaluation, so results are refreshed in
/// place rather than duplicated.
///
/// Staff-gated; faculty must own the offering.
///
/// ### Responses
/// - `200 OK` with the evaluation summary
/// - `403 Forbidden` (faculty without ownership)
/// - `404 Not Found` (submission, question link, or saved code missing)
pub async fn evaluate_submission(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((submission_id, question_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let db = state.db();

    let submission = match assignment_submission::Entity::find_by_id(submission_id)
        .one(db)
        .await
    {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Submission not found")),
            )
                .into_response();
        }
        Err(err) => {
            tracing::error!(%err, "DB error loading submission");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            )
                .into_response();
        }
    };

    let assignment = match assignment::Entity::find_by_id(submission.assignment_id)
        .one(db)
        .await
    {
        Ok(Some(a)) => a,
        _ => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            )
                .into_response();
        }
    };

    match may_grade(db, &user, &assignment).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::<Empty>::error(
                    "Not authorized to evaluate this offering",
                )),
            )
                .into_response();
        }
        Err(err) => {
            tracing::error!(%err, "DB error checking grading authority");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            )
                .into_response();
        }
    }

    let link = match assignment_question::Model::find_link(db, assignment.id, question_id).await {
        Ok(Some(link)) => link,
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
    };

    let code_sub =
        match code_submission::Model::find_for_pair(db, submission.id, Some(link.id)).await {
            Ok(Some(cs)) => cs,
            Ok(None) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::<Empty>::error(
                        "No code saved for this question",
                    )),
                )
                    .into_response();
            }
            Err(err) => {
                tracing::error!(%err, "DB error loading code submission");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Empty>::error("Database error")),
                )
                    .into_response();
            }
        };

    match evaluate_hidden_cases(db, state.executor(), &code_sub, question_id).await {
        Ok(summary) => Json(ApiResponse::success(
            summary.to_json(),
            "Hidden test cases executed",
        ))
        .into_response(),
        Err(err) => {
            tracing::error!(%err, code_submission_id = code_sub.id, "re-evaluation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to evaluate submission")),
            )
                .into_response()
        }
    }
}
