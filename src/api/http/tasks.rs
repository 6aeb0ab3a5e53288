// src/api/http/tasks.rs
// Task CRUD over one /tasks resource. Updates and deletes address the task
// by id in the request body, matching the existing board UI's calls.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult, IntoApiError};
use crate::models::Priority;
use crate::state::AppState;
use crate::store::tasks::{NewTask, TaskPatch};

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub updates: TaskUpdates,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct TaskUpdates {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteTaskRequest {
    pub id: Option<String>,
}

/// Strict priority parse for direct API input; the lenient fallback is only
/// for model-emitted actions.
fn parse_priority(value: Option<&str>) -> ApiResult<Option<Priority>> {
    match value {
        None => Ok(None),
        Some(raw) => Priority::parse(raw)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid priority: {raw}"))),
    }
}

pub async fn list_tasks(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let tasks = app_state
            .task_store
            .list_all()
            .await
            .into_api_error("Failed to fetch tasks")?;
        Ok(Json(tasks))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn create_task(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::bad_request("Task name is required"))?;

        let priority = parse_priority(request.priority.as_deref())?.unwrap_or_default();

        let task = app_state
            .task_store
            .create(NewTask {
                name: name.to_string(),
                description: request.description.unwrap_or_default(),
                priority,
            })
            .await
            .map_err(|err| ApiError::bad_request(err.to_string()))?;

        info!("Created task '{}' via API", task.name);
        Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": task }))))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn update_task(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let id = request
            .id
            .ok_or_else(|| ApiError::bad_request("Task ID is required for updating"))?;

        let patch = TaskPatch {
            name: request.updates.name,
            description: request.updates.description,
            priority: parse_priority(request.updates.priority.as_deref())?,
            status: request.updates.status,
        };

        let task = app_state
            .task_store
            .update(&id, patch)
            .await
            .map_err(|err| ApiError::bad_request(err.to_string()))?
            .ok_or_else(|| ApiError::not_found("Task not found"))?;

        Ok(Json(json!({ "success": true, "data": task })))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn delete_task(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<DeleteTaskRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let id = request
            .id
            .ok_or_else(|| ApiError::bad_request("Task ID is required for deletion"))?;

        let deleted = app_state
            .task_store
            .delete(&id)
            .await
            .into_api_error("Failed to delete task")?;
        if !deleted {
            return Err(ApiError::not_found("Task not found"));
        }

        Ok(Json(json!({ "success": true, "data": {} })))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}
