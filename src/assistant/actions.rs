//! Typed task actions and their executor.
//!
//! Actions run sequentially in array order so a create followed by a delete
//! naming the same task behaves deterministically. Each action has its own
//! failure boundary: a bad element or store error is logged and the rest
//! still run.

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::models::Priority;
use crate::store::tasks::{NewTask, TaskPatch, TaskStore};

/// One requested task mutation, as emitted by the model. Field names mirror
/// the JSON shape the system instruction asks for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum TaskAction {
    #[serde(rename = "create")]
    Create {
        #[serde(rename = "Task")]
        task: String,
        #[serde(rename = "Project")]
        project: Option<String>,
        #[serde(rename = "Priority")]
        priority: Option<String>,
    },
    #[serde(rename = "update")]
    Update {
        #[serde(rename = "searchName")]
        search_name: String,
        status: Option<String>,
        #[serde(rename = "Priority")]
        priority: Option<String>,
    },
    #[serde(rename = "delete")]
    Delete {
        #[serde(rename = "searchName")]
        search_name: String,
    },
}

/// Apply extracted actions against the task store, in order.
pub async fn apply_actions(store: &TaskStore, actions: &[Value]) {
    info!("Processing {} task action(s)", actions.len());

    for value in actions {
        let action = match serde_json::from_value::<TaskAction>(value.clone()) {
            Ok(action) => action,
            Err(err) => {
                warn!("Skipping unrecognized action {value}: {err}");
                continue;
            }
        };

        if let Err(err) = apply_one(store, &action).await {
            error!("Error processing action: {err:#}");
        }
    }
}

async fn apply_one(store: &TaskStore, action: &TaskAction) -> Result<()> {
    match action {
        TaskAction::Create { task, project, priority } => {
            info!("Creating task: {task}");
            // the description keeps the raw Priority string even when it is
            // not a valid enum value; only the stored priority falls back
            let description = format!(
                "Project: {} | Priority: {}",
                project.as_deref().unwrap_or("General"),
                priority.as_deref().unwrap_or("Medium"),
            );
            store
                .create(NewTask {
                    name: task.clone(),
                    description,
                    priority: Priority::parse_or_medium(priority.as_deref()),
                })
                .await?;
        }

        TaskAction::Update { search_name, status, priority } => {
            // an empty status or an unrecognized priority is treated as
            // absent, never written
            let patch = TaskPatch {
                status: status.clone().filter(|s| !s.is_empty()),
                priority: priority.as_deref().and_then(Priority::parse),
                ..Default::default()
            };
            if patch.is_empty() {
                debug!("Update for '{search_name}' carried no fields, skipping");
                return Ok(());
            }
            info!("Updating task: {search_name}");
            match store.update_first_matching(search_name, patch).await? {
                Some(task) => debug!("Updated task '{}'", task.name),
                None => debug!("No task matching '{search_name}', nothing to update"),
            }
        }

        TaskAction::Delete { search_name } => {
            info!("Deleting task: {search_name}");
            match store.delete_first_matching(search_name).await? {
                Some(task) => debug!("Deleted task '{}'", task.name),
                None => debug!("No task matching '{search_name}', nothing to delete"),
            }
        }
    }

    Ok(())
}
