// src/store/mod.rs

pub mod migrations;
pub mod sessions;
pub mod tasks;

pub use sessions::SessionStore;
pub use tasks::TaskStore;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Open the SQLite database (creating the file if missing) and bootstrap the
/// schema. The pool lives for the process; stores share it by clone.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrations::run(&pool).await?;
    info!("Database connected: {}", database_url);
    Ok(pool)
}
