//! Receipt index database operations
//!
//! Every query is scoped by `business_id`; a receipt id from another business
//! behaves exactly like a missing one.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::Result;

/// Receipt row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReceiptRow {
    pub id: i64,
    pub business_id: i64,
    pub status: String,
    pub source_filename: String,
    pub saved_json_path: String,
    pub vendor: Option<String>,
    pub date: Option<String>,
    pub total: Option<f64>,
    pub category: Option<String>,
    pub needs_review: bool,
    pub flags_json: Option<String>,
    pub created_at: Option<String>,
    pub exported_at: Option<String>,
    pub archived_at: Option<String>,
}

impl ReceiptRow {
    pub fn flags(&self) -> Vec<String> {
        self.flags_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }
}

/// Lightweight listing entry for `/receipts` and the review queue
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptListItem {
    pub id: i64,
    pub business_id: i64,
    pub status: String,
    pub exported_at: Option<String>,
    pub archived_at: Option<String>,
    pub filename: String,
    pub vendor: Option<String>,
    pub date: Option<String>,
    pub total: Option<f64>,
    pub category: Option<String>,
    pub needs_review: bool,
    pub flags: Vec<String>,
    pub created_at: Option<String>,
}

impl From<ReceiptRow> for ReceiptListItem {
    fn from(row: ReceiptRow) -> Self {
        let flags = row.flags();
        Self {
            id: row.id,
            business_id: row.business_id,
            status: row.status,
            exported_at: row.exported_at,
            archived_at: row.archived_at,
            filename: row.source_filename,
            vendor: row.vendor,
            date: row.date,
            total: row.total,
            category: row.category,
            needs_review: row.needs_review,
            flags,
            created_at: row.created_at,
        }
    }
}

/// Which receipts a listing includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Active,
    Archived,
    All,
}

impl StatusFilter {
    /// Unknown values fall back to `Active`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "archived" => Self::Archived,
            "all" => Self::All,
            _ => Self::Active,
        }
    }
}

/// Summary fields stored when a receipt is processed
#[derive(Debug, Clone, Default)]
pub struct NewReceipt {
    pub business_id: i64,
    pub source_filename: String,
    pub saved_json_path: String,
    pub vendor: Option<String>,
    pub date: Option<String>,
    pub total: Option<f64>,
    pub category: Option<String>,
    pub needs_review: bool,
    pub flags: Vec<String>,
}

/// Searchable fields touched by a review. `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct ReviewFields {
    pub vendor: Option<String>,
    pub date: Option<String>,
    pub total: Option<f64>,
    pub category: Option<String>,
    pub needs_review: Option<bool>,
    pub flags: Option<Vec<String>>,
}

enum Bind {
    Text(String),
    Real(f64),
    Int(i64),
}

const ROW_COLUMNS: &str = "id, business_id, status, source_filename, saved_json_path, vendor, \
     date, total, category, needs_review, flags_json, created_at, exported_at, archived_at";

/// Receipt repository
pub struct ReceiptRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReceiptRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an active receipt and return its id
    pub async fn insert(&self, receipt: &NewReceipt) -> Result<i64> {
        let flags_json = serde_json::to_string(&receipt.flags)?;

        let result = sqlx::query(
            r#"
            INSERT INTO receipts (
                business_id, status, source_filename, saved_json_path,
                vendor, date, total, category, needs_review, flags_json
            )
            VALUES (?, 'active', ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(receipt.business_id)
        .bind(&receipt.source_filename)
        .bind(&receipt.saved_json_path)
        .bind(&receipt.vendor)
        .bind(&receipt.date)
        .bind(receipt.total)
        .bind(&receipt.category)
        .bind(receipt.needs_review)
        .bind(flags_json)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update_saved_path(&self, id: i64, business_id: i64, path: &str) -> Result<()> {
        sqlx::query("UPDATE receipts SET saved_json_path = ? WHERE id = ? AND business_id = ?")
            .bind(path)
            .bind(id)
            .bind(business_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Delete a receipt row
    pub async fn delete(&self, id: i64, business_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM receipts WHERE id = ? AND business_id = ?")
            .bind(id)
            .bind(business_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Update only the provided searchable fields
    pub async fn update_review_fields(
        &self,
        id: i64,
        business_id: i64,
        fields: &ReviewFields,
    ) -> Result<()> {
        let mut set_clauses = Vec::new();
        let mut binds = Vec::new();

        if let Some(ref vendor) = fields.vendor {
            set_clauses.push("vendor = ?");
            binds.push(Bind::Text(vendor.clone()));
        }
        if let Some(ref date) = fields.date {
            set_clauses.push("date = ?");
            binds.push(Bind::Text(date.clone()));
        }
        if let Some(total) = fields.total {
            set_clauses.push("total = ?");
            binds.push(Bind::Real(total));
        }
        if let Some(ref category) = fields.category {
            set_clauses.push("category = ?");
            binds.push(Bind::Text(category.clone()));
        }
        if let Some(needs_review) = fields.needs_review {
            set_clauses.push("needs_review = ?");
            binds.push(Bind::Int(needs_review as i64));
        }
        if let Some(ref flags) = fields.flags {
            set_clauses.push("flags_json = ?");
            binds.push(Bind::Text(serde_json::to_string(flags)?));
        }

        if set_clauses.is_empty() {
            return Ok(());
        }

        let query = format!(
            "UPDATE receipts SET {} WHERE id = ? AND business_id = ?",
            set_clauses.join(", ")
        );

        let mut sql_query = sqlx::query(&query);
        for bind in binds {
            sql_query = match bind {
                Bind::Text(v) => sql_query.bind(v),
                Bind::Real(v) => sql_query.bind(v),
                Bind::Int(v) => sql_query.bind(v),
            };
        }
        sql_query.bind(id).bind(business_id).execute(self.pool).await?;

        Ok(())
    }

    pub async fn get(&self, id: i64, business_id: i64) -> Result<Option<ReceiptRow>> {
        let row = sqlx::query_as::<_, ReceiptRow>(&format!(
            "SELECT {} FROM receipts WHERE id = ? AND business_id = ?",
            ROW_COLUMNS
        ))
        .bind(id)
        .bind(business_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Newest first
    pub async fn list(
        &self,
        business_id: i64,
        status: StatusFilter,
        limit: i64,
    ) -> Result<Vec<ReceiptListItem>> {
        let status_clause = match status {
            StatusFilter::Active => " AND status = 'active'",
            StatusFilter::Archived => " AND status = 'archived'",
            StatusFilter::All => "",
        };

        let rows = sqlx::query_as::<_, ReceiptRow>(&format!(
            "SELECT {} FROM receipts WHERE business_id = ?{} ORDER BY id DESC LIMIT ?",
            ROW_COLUMNS, status_clause
        ))
        .bind(business_id)
        .bind(limit.max(1))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Active receipts that need review, newest first
    pub async fn list_review_queue(
        &self,
        business_id: i64,
        limit: i64,
    ) -> Result<Vec<ReceiptListItem>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(&format!(
            r#"
            SELECT {}
            FROM receipts
            WHERE business_id = ? AND status = 'active' AND needs_review = 1
            ORDER BY id DESC
            LIMIT ?
            "#,
            ROW_COLUMNS
        ))
        .bind(business_id)
        .bind(limit.max(1))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Archive receipts; `mark_exported` stamps `exported_at` if not already set.
    /// Returns the number of rows changed.
    pub async fn archive(&self, ids: &[i64], business_id: i64, mark_exported: bool) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut sets = vec!["status = 'archived'", "archived_at = datetime('now')"];
        if mark_exported {
            sets.push("exported_at = COALESCE(exported_at, datetime('now'))");
        }

        let query = format!(
            "UPDATE receipts SET {} WHERE business_id = ? AND id IN ({})",
            sets.join(", "),
            placeholders(ids.len())
        );
        self.execute_for_ids(&query, business_id, ids).await
    }

    pub async fn unarchive(&self, ids: &[i64], business_id: i64) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let query = format!(
            "UPDATE receipts SET status = 'active', archived_at = NULL \
             WHERE business_id = ? AND id IN ({})",
            placeholders(ids.len())
        );
        self.execute_for_ids(&query, business_id, ids).await
    }

    async fn execute_for_ids(&self, query: &str, business_id: i64, ids: &[i64]) -> Result<u64> {
        let mut sql_query = sqlx::query(query).bind(business_id);
        for id in ids {
            sql_query = sql_query.bind(*id);
        }
        let result = sql_query.execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
