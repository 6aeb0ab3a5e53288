// src/state.rs

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::assistant::Assistant;
use crate::config::CONFIG;
use crate::llm::GenerativeModel;
use crate::store::{SessionStore, TaskStore};

#[derive(Clone)]
pub struct AppState {
    pub task_store: Arc<TaskStore>,
    pub session_store: Arc<SessionStore>,
    pub assistant: Arc<Assistant>,
}

/// Wire the stores and the assistant around one pool and one model client.
/// Everything downstream receives its collaborators by injection; nothing
/// reaches for globals.
pub fn create_app_state(pool: SqlitePool, model: Arc<dyn GenerativeModel>) -> AppState {
    let task_store = Arc::new(TaskStore::new(pool.clone()));
    let session_store = Arc::new(SessionStore::new(pool));

    let assistant = Arc::new(Assistant::new(
        model,
        task_store.clone(),
        session_store.clone(),
        CONFIG.primary_model.clone(),
        CONFIG.fallback_model.clone(),
    ));

    AppState { task_store, session_store, assistant }
}
