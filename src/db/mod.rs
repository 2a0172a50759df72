//! Database module for SQLite persistence
//!
//! Handles users, businesses, memberships and the searchable receipt index.

mod businesses;
mod receipts;
mod schema;
mod users;

pub use businesses::*;
pub use receipts::*;
pub use schema::*;
pub use users::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::Result;

/// Create a new database connection pool
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run migrations
    initialize_schema(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn test_pool(dir: &std::path::Path) -> SqlitePool {
    create_pool(&format!("sqlite:{}", dir.join("test.db").display()))
        .await
        .unwrap()
}
