//! User database operations

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// Stored in `password_hash` for users who only sign in with emailed codes
const CODE_LOGIN_SENTINEL: &str = "magic";

/// User record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: Option<String>,
}

/// User repository
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at FROM users WHERE email = ?",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Find the user for a verified login email, creating it on first login
    pub async fn get_or_create_for_login(&self, email: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::BadRequest("Valid email required".to_string()));
        }

        sqlx::query("INSERT OR IGNORE INTO users (email, password_hash) VALUES (?, ?)")
            .bind(&email)
            .bind(CODE_LOGIN_SENTINEL)
            .execute(self.pool)
            .await?;

        self.get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let dir = tempdir().unwrap();
        let pool = crate::db::test_pool(dir.path()).await;
        let repo = UserRepository::new(&pool);

        let first = repo.get_or_create_for_login(" Owner@Example.com ").await.unwrap();
        let second = repo.get_or_create_for_login("owner@example.com").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.email, "owner@example.com");

        let found = repo.get_by_email("OWNER@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(repo.get(first.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejects_invalid_email() {
        let dir = tempdir().unwrap();
        let pool = crate::db::test_pool(dir.path()).await;
        let err = UserRepository::new(&pool)
            .get_or_create_for_login("not-an-email")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
