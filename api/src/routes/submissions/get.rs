use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::EntityTrait;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::auth::guards::may_grade;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::{
    assignment, assignment_submission, code_submission, code_submission_result, submission_grade,
    user::Role,
};

#[derive(Debug, Serialize)]
pub struct CodeEntry {
    #[serde(flatten)]
    pub code_submission: code_submission::Model,
    pub test_case_results: Vec<code_submission_result::Model>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: assignment_submission::Model,
    pub code: Vec<CodeEntry>,
    pub grades: Vec<submission_grade::Model>,
}

/// GET /submissions/{submission_id}
///
/// Full detail of one submission: the submission row, every code submission
/// with its per-test-case results, and the grade history.
///
/// Visible to the owning student and to graders (TA/admin anywhere, faculty
/// on their own offerings).
///
/// ### Responses
/// - `200 OK` with the detail payload
/// - `403 Forbidden` (not the owner, not a grader of this offering)
/// - `404 Not Found`
pub async fn get_submission(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(submission_id): Path<i64>,
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

    let is_owner = claims.role == Role::Student && submission.student_id == claims.sub;
    if !is_owner {
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

        match may_grade(db, &AuthUser(claims.clone()), &assignment).await {
            Ok(true) => {}
            Ok(false) => {
                return (
                    StatusCode::FORBIDDEN,
                    Json(ApiResponse::<Empty>::error(
                        "Not authorized to view this submission",
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
    }

    let code_submissions = match code_submission::Model::for_submission(db, submission.id).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!(%err, "DB error loading code submissions");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            )
                .into_response();
        }
    };

    let mut code = Vec::with_capacity(code_submissions.len());
    for cs in code_submissions {
        let results = match code_submission_result::Model::for_code_submission(db, cs.id).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(%err, "DB error loading test case results");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Empty>::error("Database error")),
                )
                    .into_response();
            }
        };
        code.push(CodeEntry {
            code_submission: cs,
            test_case_results: results,
        });
    }

    let grades = match submission_grade::Model::history(db, submission.id).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!(%err, "DB error loading grade history");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            )
                .into_response();
        }
    };

    Json(ApiResponse::success(
        SubmissionDetail {
            submission,
            code,
            grades,
        },
        "Submission retrieved",
    ))
    .into_response()
}
