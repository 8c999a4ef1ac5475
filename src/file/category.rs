//! Category types and repository.
//!
//! Every query takes the owner's user id; there is no way to read or write a
//! category without one.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::MAX_CATEGORY_NAME_LENGTH;
use crate::{CaixaError, Result};

/// A user-owned category.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: String,
    /// Category name, unique per owner.
    pub name: String,
    /// Owning user.
    pub user_id: String,
}

/// Check a requested category name and return the name to store.
///
/// Absent or blank names are a missing field. Surrounding whitespace is
/// trimmed.
pub fn validate_category_name(name: Option<&str>) -> Result<String> {
    let name = name.map(str::trim).unwrap_or_default();

    if name.is_empty() {
        return Err(CaixaError::Validation("Name required".to_string()));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(CaixaError::Validation(format!(
            "Name must be at most {MAX_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(CaixaError::Validation(
            "Name must not contain control characters".to_string(),
        ));
    }

    Ok(name.to_string())
}

/// Repository for category operations.
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new CategoryRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a category owned by `owner_id`.
    ///
    /// Any constraint failure (duplicate name, unknown owner) is reported as
    /// the same "already exists" conflict.
    pub async fn create(&self, owner_id: &str, name: &str) -> Result<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            user_id: owner_id.to_string(),
        };

        sqlx::query("INSERT INTO categories (id, name, user_id) VALUES (?, ?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.user_id)
            .execute(self.pool)
            .await
            .map_err(|e| match CaixaError::from(e) {
                CaixaError::Conflict(_) => {
                    CaixaError::Conflict("Category already exists".to_string())
                }
                other => other,
            })?;

        Ok(category)
    }

    /// Get a category by ID if `owner_id` owns it.
    pub async fn get(&self, owner_id: &str, id: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, user_id FROM categories WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// List the owner's categories by name.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, user_id FROM categories WHERE user_id = ? ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }
}
