//! System-instruction assembly for the assistant turn.

use serde::Serialize;

use crate::models::{Priority, Task};

/// Reduced task shape handed to the model as situational grounding.
#[derive(Debug, Serialize)]
pub struct TaskContext {
    pub name: String,
    pub status: String,
    pub priority: Priority,
}

impl From<&Task> for TaskContext {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            status: task.status.clone(),
            priority: task.priority,
        }
    }
}

/// The fixed system instruction: persona, output rules for speech, the exact
/// action JSON shape, and the current pending tasks.
pub fn system_instruction(assistant_name: &str, user_title: &str, tasks: &[TaskContext]) -> String {
    let task_list =
        serde_json::to_string_pretty(tasks).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are {assistant_name}, a helpful voice assistant.
Address the user as "{user_title}".

IMPORTANT RULES:
1. Reply in a conversational manner but keep your answer extremely short and concise (max 2 sentences).
2. Do not use markdown formatting (no bold/bullets), just plain text for speech.
3. If the user asks to CREATE, UPDATE (status or priority), or DELETE a task, confirm it briefly AND output a JSON block at the end (hidden from speech) to execute it.

JSON FORMAT FOR ACTIONS:
```json
[
  {{"action": "create", "Task": "task name", "Project": "category", "Priority": "High/Medium/Low"}},
  {{"action": "update", "searchName": "task name to find", "status": "Completed/Pending", "Priority": "High/Medium/Low"}},
  {{"action": "delete", "searchName": "task name to delete"}}
]
```
Note: For updates, only include fields that need changing. Status must be "Pending", "Completed", or similar.

CURRENT PENDING TASKS:
{task_list}"#
    )
}
