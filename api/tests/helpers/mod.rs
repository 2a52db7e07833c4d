//! Shared plumbing for API integration tests: an app wired to an in-memory
//! database and a scripted executor, plus JWT minting for seeded users.

use api::auth::Claims;
use api::state::AppState;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use db::test_utils::setup_test_db;
use judge::test_support::ScriptedExecutor;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower::util::ServiceExt;

const TEST_SECRET: &str = "test-secret";

static INIT: std::sync::Once = std::sync::Once::new();

fn init_config() {
    INIT.call_once(|| {
        unsafe {
            std::env::set_var("DATABASE_PATH", "data/test.db");
            std::env::set_var("JWT_SECRET", TEST_SECRET);
        }
        util::config::AppConfig::set_jwt_secret(TEST_SECRET);
    });
}

/// Fresh app over an in-memory database and the given scripted executor.
pub async fn test_app(executor: ScriptedExecutor) -> (Router, DatabaseConnection) {
    init_config();
    let db = setup_test_db().await;
    let state = AppState::new(db.clone(), Arc::new(executor));
    (api::routes::app(state), db)
}

/// Signs a bearer token for a seeded user.
pub fn token_for(user: &db::models::user::Model) -> String {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: (chrono::Utc::now().timestamp() as usize) + 3600,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// Sends one request through the router and returns status + parsed body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
