//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/judge` → ad-hoc code execution (authenticated users)
//! - `/submissions` → code submit, detail, grading, re-evaluation
//! - `/grader` → external grader webhook (no auth layer; see its module)

use axum::{Json, Router, http::StatusCode, response::IntoResponse};

use crate::response::{ApiResponse, Empty};
use crate::state::AppState;

pub mod grader;
pub mod health;
pub mod judge;
pub mod submissions;

/// Builds the router mounted under `/api`. Guards are applied per route
/// group; the grader webhook is deliberately outside the auth layer.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/judge", judge::judge_routes(app_state.clone()))
        .nest(
            "/submissions",
            submissions::submission_routes(app_state.clone()),
        )
        .nest("/grader", grader::grader_routes(app_state))
}

/// The complete application: `/api` routes plus a JSON fallback so no
/// client ever sees an HTML error page.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", routes(app_state))
        .fallback(not_found)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<Empty>::error("Route not found")),
    )
}
