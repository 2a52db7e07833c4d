//! Submission endpoints: code submit, detail retrieval, grading, and
//! staff-triggered re-evaluation.

pub mod evaluate;
pub mod get;
pub mod grade;
pub mod post;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get as axum_get, post as axum_post},
};

use crate::auth::guards::{allow_authenticated, allow_staff};
use crate::state::AppState;

pub fn submission_routes(app_state: AppState) -> Router {
    let student = Router::new()
        .route("/submit/code", axum_post(post::submit_code))
        .route("/{submission_id}", axum_get(get::get_submission))
        .route_layer(from_fn(allow_authenticated));

    let staff = Router::new()
        .route("/grade", axum_post(grade::grade_submission))
        .route(
            "/{submission_id}/evaluate/{question_id}",
            axum_post(evaluate::evaluate_submission),
        )
        .route_layer(from_fn(allow_staff));

    Router::new()
        .merge(student)
        .merge(staff)
        .with_state(app_state)
}
