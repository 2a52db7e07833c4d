use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::AuthUser;
use crate::auth::guards::may_grade;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::{assignment, assignment_submission, submission_grade};

#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    pub submission_id: i64,
    #[validate(range(min = 0, message = "score must not be negative"))]
    pub score: i64,
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub grade: submission_grade::Model,
    pub submission: assignment_submission::Model,
}

/// POST /submissions/grade
///
/// Records a manual grade. The route is staff-gated; faculty callers must
/// additionally own the course offering the submission belongs to.
///
/// Each call appends to the grade history and overwrites the submission's
/// current-grade projection; re-grading is expected, not an error.
///
/// ### Request body
/// ```json
/// { "submission_id": 5, "score": 88, "feedback": "Good" }
/// ```
///
/// ### Responses
/// - `200 OK` with the grade row and the updated submission
/// - `400 Bad Request` (negative score, score above the assignment maximum)
/// - `403 Forbidden` (faculty without ownership of the offering)
/// - `404 Not Found`
pub async fn grade_submission(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<GradeRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(errors.to_string())),
        )
            .into_response();
    }

    let db = state.db();

    let submission = match assignment_submission::Entity::find_by_id(req.submission_id)
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
                    "Not authorized to grade this offering",
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

    if req.score > assignment.max_score {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(format!(
                "Score exceeds assignment maximum of {}",
                assignment.max_score
            ))),
        )
            .into_response();
    }

    match submission_grade::Model::record(
        db,
        submission.id,
        Some(user.0.sub),
        req.score,
        req.feedback.clone(),
    )
    .await
    {
        Ok((grade, submission)) => {
            tracing::info!(
                submission_id = submission.id,
                grader_id = user.0.sub,
                score = req.score,
                "submission graded"
            );
            Json(ApiResponse::success(
                GradeResponse { grade, submission },
                "Submission graded",
            ))
            .into_response()
        }
        Err(err) => {
            tracing::error!(%err, "failed to record grade");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to record grade")),
            )
                .into_response()
        }
    }
}
