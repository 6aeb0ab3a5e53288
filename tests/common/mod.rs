// tests/common/mod.rs
// Shared fixtures: an in-memory database and a scripted model.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use taskdeck::llm::{Content, GenerativeModel, LlmError};
use taskdeck::state::{create_app_state, AppState};
use taskdeck::store::migrations;

/// Fresh in-memory database with the schema applied. A single connection so
/// every query sees the same memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    migrations::run(&pool).await.expect("migrations");
    pool
}

pub async fn test_state(model: Arc<dyn GenerativeModel>) -> Arc<AppState> {
    let pool = test_pool().await;
    Arc::new(create_app_state(pool, model))
}

pub type ScriptResult = Result<Option<String>, LlmError>;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub system: String,
    /// (role, text) pairs as sent to the model.
    pub contents: Vec<(String, String)>,
}

/// A `GenerativeModel` that replays a fixed script and records every call.
pub struct ScriptedModel {
    script: Mutex<VecDeque<ScriptResult>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn with_script(script: Vec<ScriptResult>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers once with the given text.
    pub fn replying(text: &str) -> Self {
        Self::with_script(vec![Ok(Some(text.to_string()))])
    }

    /// Fails the primary attempt and the fallback retry.
    pub fn failing() -> Self {
        Self::with_script(vec![
            Err(LlmError::Api { status: 500, body: "primary down".into() }),
            Err(LlmError::Api { status: 500, body: "fallback down".into() }),
        ])
    }

    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(
        &self,
        model: &str,
        system: &str,
        contents: &[Content],
    ) -> Result<Option<String>, LlmError> {
        self.calls.lock().await.push(RecordedCall {
            model: model.to_string(),
            system: system.to_string(),
            contents: contents
                .iter()
                .map(|c| (c.role.to_string(), c.text.clone()))
                .collect(),
        });

        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(LlmError::Api { status: 500, body: "script exhausted".into() }))
    }
}
