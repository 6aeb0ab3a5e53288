// src/models.rs
// Data contracts shared by the stores, the assistant, and the HTTP surface.
// Wire form is camelCase to stay compatible with the existing board UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a task name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Task priority. The store never holds anything outside these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Strict parse, used where an invalid value should be rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            _ => None,
        }
    }

    /// Lenient parse for model-emitted action payloads: anything missing or
    /// unrecognized becomes Medium.
    pub fn parse_or_medium(value: Option<&str>) -> Self {
        value.and_then(Priority::parse).unwrap_or_default()
    }
}

/// One entry of a task's status trail. Entries are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusEntry {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// A unit of trackable work on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    /// Free text; "Pending" on creation.
    pub status: String,
    /// Every status transition appends one entry; never reordered or pruned.
    pub status_history: Vec<StatusEntry>,
    pub created_at: DateTime<Utc>,
}

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
            ChatRole::System => "system",
        }
    }

    /// Stored roles that fail to parse are treated as model turns, matching
    /// the user-vs-everything-else mapping used for model context.
    pub fn from_db(value: &str) -> Self {
        match value {
            "user" => ChatRole::User,
            "system" => ChatRole::System,
            _ => ChatRole::Model,
        }
    }
}

/// A single conversation turn. Immutable once appended to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into(), timestamp: Utc::now() }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, content: content.into(), timestamp: Utc::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::parse_or_medium(None), Priority::Medium);
        assert_eq!(Priority::parse_or_medium(Some("Extreme")), Priority::Medium);
        assert_eq!(Priority::parse_or_medium(Some("High")), Priority::High);
        assert_eq!(Priority::parse_or_medium(Some("low")), Priority::Medium); // enum values are case-sensitive
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: "t1".into(),
            name: "Ship it".into(),
            description: String::new(),
            priority: Priority::High,
            status: "Pending".into(),
            status_history: vec![StatusEntry { status: "Pending".into(), timestamp: Utc::now() }],
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("statusHistory").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["priority"], "High");
    }

    #[test]
    fn chat_role_round_trips_through_db_strings() {
        assert_eq!(ChatRole::from_db("user"), ChatRole::User);
        assert_eq!(ChatRole::from_db("system"), ChatRole::System);
        assert_eq!(ChatRole::from_db("assistant"), ChatRole::Model);
    }
}
