//! User repository for Caixa-Preta.

use sqlx::SqlitePool;

use super::user::{NewUser, User};
use crate::{CaixaError, Result};

/// Repository for user rows.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        sqlx::query("INSERT INTO users (id, email, name) VALUES (?, ?, ?)")
            .bind(&new_user.id)
            .bind(&new_user.email)
            .bind(&new_user.name)
            .execute(self.pool)
            .await?;

        self.get_by_id(&new_user.id)
            .await?
            .ok_or_else(|| CaixaError::NotFound("User".to_string()))
    }

    /// Create the user unless a row with the same id already exists.
    pub async fn ensure(&self, new_user: &NewUser) -> Result<User> {
        sqlx::query("INSERT INTO users (id, email, name) VALUES (?, ?, ?) ON CONFLICT(id) DO NOTHING")
            .bind(&new_user.id)
            .bind(&new_user.email)
            .bind(&new_user.name)
            .execute(self.pool)
            .await?;

        self.get_by_id(&new_user.id)
            .await?
            .ok_or_else(|| CaixaError::NotFound("User".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}
