// src/api/http/router.rs
// HTTP router composition for the REST surface.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    assistant::{assistant_turn, get_chat_history},
    handlers::health_handler,
    tasks::{create_task, delete_task, list_tasks, update_task},
};
use crate::state::AppState;

/// Main HTTP router. Nested under /api in main.rs.
pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))

        // Assistant turn + transcript
        .route("/assistant", post(assistant_turn))
        .route("/chat/history", get(get_chat_history))

        // Task CRUD (body-addressed updates/deletes)
        .route(
            "/tasks",
            get(list_tasks).post(create_task).patch(update_task).delete(delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
