use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{NewUser, User};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("username or email already exists")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence for user accounts.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Any user already holding `username` or `email`.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> anyhow::Result<Option<User>>;

    /// Insert; a unique violation surfaces as `RepoError::Duplicate`.
    async fn insert(&self, new: NewUser) -> Result<User, RepoError>;

    async fn list_all(&self) -> anyhow::Result<Vec<User>>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, role, password_hash, created_at
            FROM users
            WHERE username = $1 OR email = $2
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, (Uuid, OffsetDateTime)>(
            r#"
            INSERT INTO users (username, name, email, role, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.role)
        .bind(new.password_hash())
        .fetch_one(&self.db)
        .await;

        match row {
            Ok((id, created_at)) => Ok(User::from_new(id, new, created_at)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(RepoError::Duplicate)
            }
            Err(e) => Err(RepoError::Other(anyhow::Error::new(e).context("insert user"))),
        }
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, role, password_hash, created_at
            FROM users
            ORDER BY created_at ASC, username ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }
}

#[cfg(test)]
pub use memory::MemoryUserRepo;
