//! Application state shared across Axum route handlers.

use judge::CodeExecutor;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state: the database connection and the code
/// executor. The executor sits behind its trait so tests can swap the live
/// judge client for a scripted one.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    executor: Arc<dyn CodeExecutor>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, executor: Arc<dyn CodeExecutor>) -> Self {
        Self { db, executor }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn executor(&self) -> &dyn CodeExecutor {
        self.executor.as_ref()
    }
}
