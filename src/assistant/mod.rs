//! Assistant turn orchestration: context, model call, actions, history.
//!
//! One request runs the whole pipeline end to end. The task mutations and
//! the history persist are two independent stores with no cross-store
//! transaction; actions may commit even if the final history write fails.

pub mod actions;
pub mod extractor;
pub mod prompt;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, warn};

use crate::config::CONFIG;
use crate::llm::{Content, GenerativeModel};
use crate::models::{ChatRole, ChatTurn};
use crate::store::{SessionStore, TaskStore};

use prompt::TaskContext;

/// Fixed reply when the model produced nothing usable.
pub const APOLOGY: &str = "I'm sorry, I couldn't generate a response.";

pub struct Assistant {
    model: Arc<dyn GenerativeModel>,
    tasks: Arc<TaskStore>,
    sessions: Arc<SessionStore>,
    primary_model: String,
    fallback_model: String,
}

impl Assistant {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        tasks: Arc<TaskStore>,
        sessions: Arc<SessionStore>,
        primary_model: String,
        fallback_model: String,
    ) -> Self {
        Self { model, tasks, sessions, primary_model, fallback_model }
    }

    /// Run one assistant turn and return the speakable reply.
    pub async fn handle_turn(&self, utterance: &str, session_id: &str) -> Result<String> {
        // Situational context. A broken task store degrades to an empty list
        // rather than failing the whole turn.
        let open_tasks = match self.tasks.list_open(CONFIG.context_task_limit).await {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!("Task context load failed, continuing without it: {err:#}");
                Vec::new()
            }
        };
        let context: Vec<TaskContext> = open_tasks.iter().map(TaskContext::from).collect();

        self.sessions.ensure_session(session_id).await?;

        let system =
            prompt::system_instruction(&CONFIG.assistant_name, &CONFIG.user_title, &context);

        // Last N stored turns, chronological, then the new utterance.
        let history = self.sessions.recent_turns(session_id, CONFIG.history_window).await?;
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content {
                role: if turn.role == ChatRole::User { "user" } else { "model" },
                text: turn.content.clone(),
            })
            .collect();
        contents.push(Content { role: "user", text: format!("User said: \"{utterance}\"") });

        // Primary model, one retry against the fallback on any failure.
        let reply = match self.model.generate(&self.primary_model, &system, &contents).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "{} failed, falling back to {}: {err}",
                    self.primary_model, self.fallback_model
                );
                match self.model.generate(&self.fallback_model, &system, &contents).await {
                    Ok(text) => text,
                    Err(err) => {
                        error!("Fallback model failed as well: {err}");
                        None
                    }
                }
            }
        };

        let Some(raw_reply) = reply.filter(|text| !text.trim().is_empty()) else {
            // The transcript still records the failed exchange; no task
            // mutation happens on this path.
            self.sessions
                .append_turns(
                    session_id,
                    &[ChatTurn::user(utterance), ChatTurn::model(APOLOGY)],
                )
                .await?;
            return Ok(APOLOGY.to_string());
        };

        // Actions first (they read the raw reply), then the speakable text.
        if let Some(action_values) = extractor::extract_actions(&raw_reply) {
            actions::apply_actions(&self.tasks, &action_values).await;
        }
        let spoken = extractor::strip_action_block(&raw_reply);

        self.sessions
            .append_turns(
                session_id,
                &[ChatTurn::user(utterance), ChatTurn::model(spoken.clone())],
            )
            .await?;

        debug!("Assistant turn complete for session {session_id}");
        Ok(spoken)
    }
}
