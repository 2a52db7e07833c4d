use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;

use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::{
    assignment_submission::{self, SubmissionStatus},
    submission_grade,
};

/// The webhook carries no authentication of its own; deployments are
/// expected to restrict it to the grader network.
pub fn grader_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(grader_webhook))
        .with_state(app_state)
}

#[derive(Debug, Deserialize)]
pub struct GraderWebhookBody {
    pub submission_id: i64,
    /// Accepted for forward compatibility; the evaluation pipeline owns
    /// test results, so this field is not stored.
    pub test_results: Option<serde_json::Value>,
    pub status: Option<String>,
    pub final_score: Option<i64>,
}

/// POST /grader/webhook
///
/// Callback for an external grader. With `final_score`, an auto-grade is
/// recorded (`grader_id = NULL`, feedback "Auto-graded") and the submission
/// projection updated; without it, only the submission status changes.
///
/// ### Request body
/// ```json
/// { "submission_id": 7, "status": "running" }
/// ```
///
/// ### Responses
/// - `200 OK` `{"success": true}`
/// - `400 Bad Request` (unknown status string, neither score nor status)
/// - `404 Not Found`
async fn grader_webhook(
    State(state): State<AppState>,
    Json(body): Json<GraderWebhookBody>,
) -> impl IntoResponse {
    let db = state.db();

    let status = match body.status.as_deref() {
        Some(raw) => match raw.parse::<SubmissionStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<Empty>::error(format!(
                        "Unknown submission status `{raw}`"
                    ))),
                )
                    .into_response();
            }
        },
        None => None,
    };

    if let Some(score) = body.final_score {
        return match submission_grade::Model::record(
            db,
            body.submission_id,
            None,
            score,
            Some("Auto-graded".to_string()),
        )
        .await
        {
            Ok((_, submission)) => {
                tracing::info!(
                    submission_id = submission.id,
                    score,
                    "auto-grade recorded from grader webhook"
                );
                Json(ApiResponse::success(json!({}), "Webhook processed")).into_response()
            }
            Err(sea_orm::DbErr::RecordNotFound(_)) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Submission not found")),
            )
                .into_response(),
            Err(err) => {
                tracing::error!(%err, "failed to record auto-grade");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Empty>::error("Failed to record grade")),
                )
                    .into_response()
            }
        };
    }

    // Status-only update.
    let Some(status) = status else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(
                "Webhook carries neither final_score nor status",
            )),
        )
            .into_response();
    };

    match assignment_submission::Model::set_status(db, body.submission_id, status).await {
        Ok(_) => Json(ApiResponse::success(json!({}), "Webhook processed")).into_response(),
        Err(sea_orm::DbErr::RecordNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Submission not found")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(%err, "failed to update submission status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to update status")),
            )
                .into_response()
        }
    }
}
