// tests/http_api.rs
// REST contract tests driven through the router with tower's oneshot.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use taskdeck::api::http::http_router;
use taskdeck::llm::GenerativeModel;
use taskdeck::state::AppState;

use common::{test_state, ScriptedModel};

async fn test_app(model: ScriptedModel) -> (Router, Arc<AppState>) {
    let state = test_state(Arc::new(model) as Arc<dyn GenerativeModel>).await;
    let app = Router::new().nest("/api", http_router(state.clone()));
    (app, state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn create_task_returns_created_envelope() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "name": "Ship release", "priority": "High" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let task = &body["data"];
    assert_eq!(task["name"], "Ship release");
    assert_eq!(task["priority"], "High");
    assert_eq!(task["status"], "Pending");
    assert_eq!(task["statusHistory"].as_array().unwrap().len(), 1);
    assert!(task["id"].is_string());
    assert!(task["createdAt"].is_string());
}

#[tokio::test]
async fn create_task_without_name_is_rejected() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (status, body) =
        send(&app, Method::POST, "/api/tasks", Some(json!({ "description": "no name" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Task name is required");

    let (status, _) =
        send(&app, Method::POST, "/api/tasks", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_task_with_unknown_priority_is_rejected() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "name": "Ship release", "priority": "Urgent" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid priority: Urgent");
}

#[tokio::test]
async fn list_tasks_is_bare_array_newest_first() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    send(&app, Method::POST, "/api/tasks", Some(json!({ "name": "first" }))).await;
    send(&app, Method::POST, "/api/tasks", Some(json!({ "name": "second" }))).await;

    let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;

    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["name"], "second");
    assert_eq!(tasks[1]["name"], "first");
}

#[tokio::test]
async fn patch_updates_status_and_appends_history() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (_, created) =
        send(&app, Method::POST, "/api/tasks", Some(json!({ "name": "track me" }))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/tasks",
        Some(json!({ "id": id, "updates": { "status": "In Progress" } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let task = &body["data"];
    assert_eq!(task["status"], "In Progress");
    let history = task["statusHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["status"], "In Progress");
}

#[tokio::test]
async fn patch_requires_id_and_existing_task() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/tasks",
        Some(json!({ "updates": { "status": "Done" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Task ID is required for updating");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/tasks",
        Some(json!({ "id": "no-such-id", "updates": { "status": "Done" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
async fn delete_removes_task_and_404s_after() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (_, created) =
        send(&app, Method::POST, "/api/tasks", Some(json!({ "name": "disposable" }))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) =
        send(&app, Method::DELETE, "/api/tasks", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) =
        send(&app, Method::DELETE, "/api/tasks", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tasks) = send(&app, Method::GET, "/api/tasks", None).await;
    assert!(tasks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn assistant_endpoint_runs_actions_and_persists_transcript() {
    let reply = "Done! ```json\n[{\"action\":\"delete\",\"searchName\":\"disposable\"}]\n```";
    let (app, state) = test_app(ScriptedModel::replying(reply)).await;

    send(&app, Method::POST, "/api/tasks", Some(json!({ "name": "disposable" }))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assistant",
        Some(json!({ "userQuery": "drop the disposable task", "sessionId": "s1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Done!");

    assert!(state.task_store.list_all().await.unwrap().is_empty());

    let (status, body) =
        send(&app, Method::GET, "/api/chat/history?session_id=s1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], "s1");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "drop the disposable task");
    assert_eq!(messages[1]["role"], "model");
    assert_eq!(messages[1]["content"], "Done!");
}

#[tokio::test]
async fn assistant_accepts_any_utterance_key() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![
        Ok(Some("Hello.".into())),
        Ok(Some("Hi there.".into())),
    ]))
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assistant",
        Some(json!({ "text": "hey", "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Hello.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assistant",
        Some(json!({ "message": "hey again", "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Hi there.");
}

#[tokio::test]
async fn assistant_without_message_is_rejected() {
    let (app, _) = test_app(ScriptedModel::with_script(vec![])).await;

    let (status, body) =
        send(&app, Method::POST, "/api/assistant", Some(json!({ "sessionId": "s1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No message provided");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assistant",
        Some(json!({ "message": "   ", "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_history_defaults_and_pagination() {
    let (app, state) = test_app(ScriptedModel::with_script(vec![])).await;

    use taskdeck::models::ChatTurn;
    let turns: Vec<ChatTurn> = (1..=5)
        .map(|i| ChatTurn::user(format!("message {i}")))
        .collect();
    state.session_store.append_turns("s1", &turns).await.unwrap();

    let (status, body) =
        send(&app, Method::GET, "/api/chat/history?session_id=s1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    // newest window, chronological order inside it
    assert_eq!(messages[0]["content"], "message 4");
    assert_eq!(messages[1]["content"], "message 5");

    let (_, body) =
        send(&app, Method::GET, "/api/chat/history?session_id=s1&limit=2&offset=2", None).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages[0]["content"], "message 2");
    assert_eq!(messages[1]["content"], "message 3");

    // unknown session is an empty transcript, not an error
    let (status, body) =
        send(&app, Method::GET, "/api/chat/history?session_id=nobody", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messages"].as_array().unwrap().is_empty());
}
