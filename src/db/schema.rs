//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

pub const DEFAULT_BUSINESS_NAME: &str = "Default Business";

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    // Rows written before businesses existed belong to the first business
    sqlx::query(
        r#"
        INSERT INTO businesses (name)
        SELECT ? WHERE NOT EXISTS (SELECT 1 FROM businesses)
        "#,
    )
    .bind(DEFAULT_BUSINESS_NAME)
    .execute(pool)
    .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Users (login is by emailed code; password_hash holds a sentinel)
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Businesses
CREATE TABLE IF NOT EXISTS businesses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Which users may act for which business
CREATE TABLE IF NOT EXISTS memberships (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    business_id INTEGER NOT NULL,
    role TEXT DEFAULT 'owner',
    created_at TEXT DEFAULT (datetime('now')),
    UNIQUE(user_id, business_id)
);

CREATE INDEX IF NOT EXISTS idx_memberships_user_id ON memberships(user_id);
CREATE INDEX IF NOT EXISTS idx_memberships_business_id ON memberships(business_id);

-- Searchable receipt summary; the full payload lives on disk
CREATE TABLE IF NOT EXISTS receipts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    business_id INTEGER NOT NULL DEFAULT 1,
    status TEXT NOT NULL DEFAULT 'active',
    source_filename TEXT NOT NULL,
    saved_json_path TEXT NOT NULL DEFAULT '',
    vendor TEXT,
    date TEXT,
    total REAL,
    category TEXT,
    needs_review INTEGER DEFAULT 0,
    flags_json TEXT DEFAULT '[]',
    created_at TEXT DEFAULT (datetime('now')),
    exported_at TEXT,
    archived_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_receipts_business_id ON receipts(business_id);
CREATE INDEX IF NOT EXISTS idx_receipts_business_status ON receipts(business_id, status);
CREATE INDEX IF NOT EXISTS idx_receipts_business_needs_review ON receipts(business_id, needs_review);
CREATE INDEX IF NOT EXISTS idx_receipts_needs_review ON receipts(needs_review);
CREATE INDEX IF NOT EXISTS idx_receipts_vendor ON receipts(vendor);
CREATE INDEX IF NOT EXISTS idx_receipts_date ON receipts(date);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_schema_is_idempotent_and_seeds_one_business() {
        let dir = tempdir().unwrap();
        let pool = crate::db::test_pool(dir.path()).await;
        initialize_schema(&pool).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM businesses")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
