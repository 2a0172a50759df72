//! Business and membership database operations

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// Business record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Business {
    pub id: i64,
    pub name: String,
}

/// Business repository
pub struct BusinessRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BusinessRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> Result<Business> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Business name required".to_string()));
        }

        let result = sqlx::query("INSERT INTO businesses (name) VALUES (?)")
            .bind(name)
            .execute(self.pool)
            .await?;

        Ok(Business {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Idempotent; an existing membership keeps its role
    pub async fn add_membership(&self, user_id: i64, business_id: i64, role: &str) -> Result<()> {
        let role = if role.trim().is_empty() { "owner" } else { role.trim() };
        sqlx::query(
            "INSERT OR IGNORE INTO memberships (user_id, business_id, role) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(business_id)
        .bind(role)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Business>> {
        let businesses = sqlx::query_as::<_, Business>(
            r#"
            SELECT b.id, b.name
            FROM businesses b
            JOIN memberships m ON m.business_id = b.id
            WHERE m.user_id = ?
            ORDER BY b.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(businesses)
    }

    pub async fn user_has_access(&self, user_id: i64, business_id: i64) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM memberships WHERE user_id = ? AND business_id = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(business_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// The user's first business, creating one (with owner membership) if none
    pub async fn get_or_create_single_for_user(
        &self,
        user_id: i64,
        default_name: &str,
    ) -> Result<Business> {
        if let Some(first) = self.list_for_user(user_id).await?.into_iter().next() {
            return Ok(first);
        }

        let name = if default_name.trim().is_empty() {
            "My Business"
        } else {
            default_name
        };
        let business = self.create(name).await?;
        self.add_membership(user_id, business.id, "owner").await?;

        tracing::info!(user_id, business_id = business.id, "Created business for user");
        Ok(business)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_membership_scoping() {
        let dir = tempdir().unwrap();
        let pool = crate::db::test_pool(dir.path()).await;
        let repo = BusinessRepository::new(&pool);

        let biz = repo.create("  Acme Plumbing ").await.unwrap();
        assert_eq!(biz.name, "Acme Plumbing");
        assert!(!repo.user_has_access(7, biz.id).await.unwrap());

        repo.add_membership(7, biz.id, "owner").await.unwrap();
        repo.add_membership(7, biz.id, "viewer").await.unwrap();
        assert!(repo.user_has_access(7, biz.id).await.unwrap());
        assert_eq!(repo.list_for_user(7).await.unwrap(), vec![biz]);
        assert!(repo.list_for_user(8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_business_created_once() {
        let dir = tempdir().unwrap();
        let pool = crate::db::test_pool(dir.path()).await;
        let repo = BusinessRepository::new(&pool);

        let first = repo.get_or_create_single_for_user(3, "sam's Business").await.unwrap();
        let again = repo.get_or_create_single_for_user(3, "ignored").await.unwrap();
        assert_eq!(first, again);
        assert_eq!(first.name, "sam's Business");
        assert!(repo.user_has_access(3, first.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let dir = tempdir().unwrap();
        let pool = crate::db::test_pool(dir.path()).await;
        assert!(matches!(
            BusinessRepository::new(&pool).create("   ").await,
            Err(AppError::BadRequest(_))
        ));
    }
}
