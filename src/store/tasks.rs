//! SQLite-backed task store.
//!
//! Status transitions are recorded here so every writer (REST handlers and
//! the assistant's action executor) appends to the status history the same
//! way. Fuzzy lookups match a case-insensitive substring of the name and
//! take the first hit in insertion (rowid) order, the store's natural order.

use anyhow::Result;
use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Priority, StatusEntry, Task, MAX_NAME_LEN};

pub struct TaskStore {
    pool: SqlitePool,
}

/// Input for task creation. Status is always "Pending" and is not a field.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub priority: Priority,
}

/// Sparse update: only present fields are written.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Task name is required");
    }
    if name.chars().count() > MAX_NAME_LEN {
        anyhow::bail!("Name cannot be more than {MAX_NAME_LEN} characters");
    }
    Ok(name.to_string())
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new task. Status starts at "Pending" with a seeded history
    /// entry. No duplicate-name check: repeated creates with the same name
    /// produce distinct tasks.
    pub async fn create(&self, new: NewTask) -> Result<Task> {
        let name = validate_name(&new.name)?;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            name,
            description: new.description,
            priority: new.priority,
            status: "Pending".to_string(),
            status_history: vec![StatusEntry { status: "Pending".to_string(), timestamp: now }],
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO tasks (id, name, description, priority, status, status_history, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(&task.status)
        .bind(serde_json::to_string(&task.status_history)?)
        .bind(task.created_at.naive_utc())
        .execute(&self.pool)
        .await?;

        debug!("Created task '{}' ({})", task.name, task.id);
        Ok(task)
    }

    /// All tasks, newest first.
    pub async fn list_all(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, priority, status, status_history, created_at
            FROM tasks
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_task).collect()
    }

    /// The most recent non-"Complete" tasks, for model grounding.
    pub async fn list_open(&self, limit: usize) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, priority, status, status_history, created_at
            FROM tasks
            WHERE status != 'Complete'
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_task).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<Task>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, priority, status, status_history, created_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_task).transpose()
    }

    /// Apply a sparse patch. A status change appends one status-history
    /// entry; an unchanged status does not. Returns None for an unknown id.
    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        let Some(mut task) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            task.name = validate_name(&name)?;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            if status != task.status {
                task.status_history
                    .push(StatusEntry { status: status.clone(), timestamp: Utc::now() });
            }
            task.status = status;
        }

        sqlx::query(
            r#"
            UPDATE tasks
            SET name = ?, description = ?, priority = ?, status = ?, status_history = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(&task.status)
        .bind(serde_json::to_string(&task.status_history)?)
        .bind(&task.id)
        .execute(&self.pool)
        .await?;

        Ok(Some(task))
    }

    /// Remove a task by id. Returns false if nothing matched.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// First task whose name contains `needle`, case-insensitively, in the
    /// store's natural order.
    pub async fn find_first_matching(&self, needle: &str) -> Result<Option<Task>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, priority, status, status_history, created_at
            FROM tasks
            WHERE instr(lower(name), lower(?)) > 0
            ORDER BY rowid ASC
            LIMIT 1
            "#,
        )
        .bind(needle)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_task).transpose()
    }

    /// Fuzzy-matched update. No match is a no-op returning None. Lookup and
    /// write are two steps with no isolation in between; last write wins.
    pub async fn update_first_matching(
        &self,
        needle: &str,
        patch: TaskPatch,
    ) -> Result<Option<Task>> {
        match self.find_first_matching(needle).await? {
            Some(task) => self.update(&task.id, patch).await,
            None => Ok(None),
        }
    }

    /// Fuzzy-matched delete. No match is a no-op returning None.
    pub async fn delete_first_matching(&self, needle: &str) -> Result<Option<Task>> {
        match self.find_first_matching(needle).await? {
            Some(task) => {
                self.delete(&task.id).await?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }
}

fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let history_json: String = row.get("status_history");
    let created_at: NaiveDateTime = row.get("created_at");
    let priority: String = row.get("priority");

    Ok(Task {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        priority: Priority::parse_or_medium(Some(&priority)),
        status: row.get("status"),
        status_history: serde_json::from_str(&history_json).unwrap_or_default(),
        created_at: Utc.from_utc_datetime(&created_at),
    })
}
