// src/api/http/assistant.rs
// The assistant-turn endpoint driven by the voice front-end, plus the chat
// history view.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult, IntoApiError};
use crate::config::CONFIG;
use crate::models::ChatTurn;
use crate::state::AppState;

/// The front-end has shipped all three utterance keys at various points;
/// accept any of them.
#[derive(Deserialize)]
pub struct AssistantRequest {
    pub message: Option<String>,
    #[serde(rename = "userQuery")]
    pub user_query: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct AssistantResponse {
    pub text: String,
}

pub async fn assistant_turn(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<AssistantRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let utterance = request
            .message
            .or(request.user_query)
            .or(request.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("No message provided"))?;

        let session_id = request
            .session_id
            .unwrap_or_else(|| CONFIG.default_session_id.clone());

        info!("Assistant turn for session {session_id}");

        let text = app_state
            .assistant
            .handle_turn(&utterance, &session_id)
            .await
            .map_err(|err| {
                error!("Assistant turn failed: {err:#}");
                ApiError::internal(err.to_string())
            })?;

        Ok(Json(AssistantResponse { text }))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub session_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct ChatHistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatTurn>,
}

pub async fn get_chat_history(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let session_id = params
            .session_id
            .unwrap_or_else(|| CONFIG.default_session_id.clone());
        let limit = params
            .limit
            .unwrap_or(CONFIG.history_default_limit)
            .min(CONFIG.history_max_limit);
        let offset = params.offset.unwrap_or(0);

        let messages = app_state
            .session_store
            .history(&session_id, limit, offset)
            .await
            .into_api_error("Failed to fetch chat history")?;

        Ok(Json(ChatHistoryResponse { session_id, messages }))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}
