//! SQLite-backed conversation store.
//!
//! Sessions are keyed by an opaque caller-supplied id and created lazily on
//! first use. Turns grow unbounded in storage; readers take a recent window.

use anyhow::Result;
use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::models::{ChatRole, ChatTurn};

pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Make sure a session row exists for `session_id`.
    pub async fn ensure_session(&self, session_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_sessions (session_id, last_activity)
            VALUES (?, ?)
            ON CONFLICT(session_id) DO NOTHING
            "#,
        )
        .bind(session_id)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// The most recent `n` turns, returned in chronological order.
    pub async fn recent_turns(&self, session_id: &str, n: usize) -> Result<Vec<ChatTurn>> {
        self.window(session_id, n, 0).await
    }

    /// A page of recent turns (`offset` newest turns skipped), chronological.
    pub async fn history(
        &self,
        session_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ChatTurn>> {
        self.window(session_id, limit, offset).await
    }

    async fn window(&self, session_id: &str, limit: usize, offset: usize) -> Result<Vec<ChatTurn>> {
        let rows = sqlx::query(
            r#"
            SELECT role, content, timestamp
            FROM chat_messages
            WHERE session_id = ?
            ORDER BY id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(session_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut turns: Vec<ChatTurn> = rows
            .into_iter()
            .map(|row| {
                let role: String = row.get("role");
                let timestamp: NaiveDateTime = row.get("timestamp");
                ChatTurn {
                    role: ChatRole::from_db(&role),
                    content: row.get("content"),
                    timestamp: Utc.from_utc_datetime(&timestamp),
                }
            })
            .collect();
        turns.reverse(); // newest-first query, oldest-first result
        Ok(turns)
    }

    /// Append `turns` and bump lastActivity in one transaction, so a crash
    /// cannot persist half an exchange.
    pub async fn append_turns(&self, session_id: &str, turns: &[ChatTurn]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for turn in turns {
            sqlx::query(
                r#"
                INSERT INTO chat_messages (session_id, role, content, timestamp)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(session_id)
            .bind(turn.role.as_str())
            .bind(&turn.content)
            .bind(turn.timestamp.naive_utc())
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO chat_sessions (session_id, last_activity)
            VALUES (?, ?)
            ON CONFLICT(session_id) DO UPDATE SET last_activity = excluded.last_activity
            "#,
        )
        .bind(session_id)
        .bind(Utc::now().naive_utc())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Appended {} turn(s) to session {}", turns.len(), session_id);
        Ok(())
    }
}
