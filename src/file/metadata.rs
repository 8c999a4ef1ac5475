//! File records and repository.
//!
//! Rows are immutable once written. Every query takes the owner's user id.

use sqlx::SqlitePool;

use crate::{CaixaError, Result};

/// A stored file record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredFile {
    /// Unique file ID.
    pub id: String,
    /// Original filename as uploaded.
    pub filename: String,
    /// Object storage key.
    pub path: String,
    /// Category the file is filed under.
    pub category_id: String,
    /// Owning user.
    pub user_id: String,
    /// Upload time, RFC3339 with millisecond precision.
    pub created_at: String,
}

/// A file record joined with its category's name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileWithCategory {
    /// The file record.
    #[sqlx(flatten)]
    pub file: StoredFile,
    /// Name of the category, if the category row still exists.
    pub category_name: Option<String>,
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Unique file ID.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Object storage key the bytes were written to.
    pub path: String,
    /// Category ID.
    pub category_id: String,
    /// Upload time.
    pub created_at: String,
}

/// Repository for file records.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a file record owned by `owner_id`.
    pub async fn create(&self, owner_id: &str, file: &NewFile) -> Result<StoredFile> {
        sqlx::query(
            "INSERT INTO files (id, filename, path, category_id, user_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&file.id)
        .bind(&file.filename)
        .bind(&file.path)
        .bind(&file.category_id)
        .bind(owner_id)
        .bind(&file.created_at)
        .execute(self.pool)
        .await?;

        self.get(owner_id, &file.id)
            .await?
            .ok_or_else(|| CaixaError::NotFound("File".to_string()))
    }

    /// Get a file by ID if `owner_id` owns it.
    ///
    /// A file owned by someone else is indistinguishable from a missing one.
    pub async fn get(&self, owner_id: &str, id: &str) -> Result<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(
            "SELECT id, filename, path, category_id, user_id, created_at
             FROM files WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// List the owner's files with their category, newest first.
    pub async fn list_with_category(&self, owner_id: &str) -> Result<Vec<FileWithCategory>> {
        let files = sqlx::query_as::<_, FileWithCategory>(
            "SELECT f.id, f.filename, f.path, f.category_id, f.user_id, f.created_at,
                    c.name AS category_name
             FROM files f
             LEFT JOIN categories c ON c.id = f.category_id
             WHERE f.user_id = ?
             ORDER BY f.created_at DESC, f.rowid DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::file::CategoryRepository;
    use crate::Database;

    async fn setup_db() -> (Database, String, String) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        users.create(&NewUser::new("u1")).await.unwrap();
        users.create(&NewUser::new("u2")).await.unwrap();

        let categories = CategoryRepository::new(db.pool());
        let c1 = categories.create("u1", "Receipts").await.unwrap().id;
        let c2 = categories.create("u2", "Taxes").await.unwrap().id;
        (db, c1, c2)
    }

    fn new_file(id: &str, category_id: &str, created_at: &str) -> NewFile {
        NewFile {
            id: id.to_string(),
            filename: format!("{id}.pdf"),
            path: format!("owner/{id}.pdf"),
            category_id: category_id.to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, c1, _) = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let file = repo
            .create("u1", &new_file("f1", &c1, "2024-01-15T10:30:00.000Z"))
            .await
            .unwrap();

        assert_eq!(file.id, "f1");
        assert_eq!(file.user_id, "u1");
        assert_eq!(file.category_id, c1);
        assert_eq!(repo.get("u1", "f1").await.unwrap(), Some(file));
    }

    #[tokio::test]
    async fn test_get_other_owner_is_none() {
        let (db, c1, _) = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create("u1", &new_file("f1", &c1, "2024-01-15T10:30:00.000Z"))
            .await
            .unwrap();

        assert!(repo.get("u2", "f1").await.unwrap().is_none());
        assert!(repo.get("u1", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_category() {
        let (db, c1, c2) = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create("u1", &new_file("old", &c1, "2024-01-15T10:30:00.000Z"))
            .await
            .unwrap();
        repo.create("u1", &new_file("new", &c1, "2024-01-15T10:30:00.250Z"))
            .await
            .unwrap();
        repo.create("u2", &new_file("theirs", &c2, "2024-01-15T11:00:00.000Z"))
            .await
            .unwrap();

        let files = repo.list_with_category("u1").await.unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.file.id.as_str()).collect();

        assert_eq!(ids, vec!["new", "old"]);
        assert!(files
            .iter()
            .all(|f| f.category_name.as_deref() == Some("Receipts")));
    }

    #[tokio::test]
    async fn test_duplicate_path_rejected() {
        let (db, c1, _) = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let mut file = new_file("f1", &c1, "2024-01-15T10:30:00.000Z");
        repo.create("u1", &file).await.unwrap();

        file.id = "f2".to_string();
        assert!(repo.create("u1", &file).await.is_err());
    }
}
