//! File service for Caixa-Preta.
//!
//! This module provides high-level file operations including:
//! - Upload with ordered validation, category ownership check, store then insert
//! - Listing with the category attached
//! - Download link minting

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{CaixaError, Result};

use super::category::CategoryRepository;
use super::metadata::{FileRepository, FileWithCategory, NewFile, StoredFile};
use super::storage::{object_key, ObjectStore, SignedUrl};
use super::{ALLOWED_MIME_TYPES, MAX_UPLOAD_SIZE, SIGNED_URL_TTL_SECS};

/// A file part received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename.
    pub filename: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Create an uploaded file without a declared content type.
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            content,
        }
    }

    /// Set the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The essence of the content type, lowercased.
    ///
    /// Falls back to a guess from the filename when none was declared.
    pub fn mime_type(&self) -> String {
        let declared = self
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or_default().trim())
            .filter(|ct| !ct.is_empty());

        match declared {
            Some(ct) => ct.to_ascii_lowercase(),
            None => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_ascii_lowercase(),
        }
    }
}

/// Request data for file upload.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// The file part, if one was sent.
    pub file: Option<UploadedFile>,
    /// Target category ID, if one was sent.
    pub category_id: Option<String>,
}

/// File service for uploads, listings and download links.
pub struct FileService<'a> {
    pool: &'a SqlitePool,
    store: &'a dyn ObjectStore,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(pool: &'a SqlitePool, store: &'a dyn ObjectStore) -> Self {
        Self { pool, store }
    }

    /// Upload a file for `owner_id`.
    ///
    /// # Validation
    /// Checked in order, stopping at the first failure:
    /// - file and category present
    /// - size at most 5 MiB
    /// - MIME type in the allow-list
    /// - category owned by the caller
    ///
    /// Bytes are stored before the record is written. If the insert fails
    /// the object is left behind and logged. An upload whose key is already
    /// taken fails without touching the existing object.
    pub async fn upload(&self, owner_id: &str, request: UploadRequest) -> Result<StoredFile> {
        self.upload_at(owner_id, request, Utc::now()).await
    }

    async fn upload_at(
        &self,
        owner_id: &str,
        request: UploadRequest,
        now: DateTime<Utc>,
    ) -> Result<StoredFile> {
        let category_id = request
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let (file, category_id) = match (request.file, category_id) {
            (Some(file), Some(category_id)) if !file.filename.is_empty() => (file, category_id),
            _ => {
                return Err(CaixaError::Validation(
                    "Missing file or category".to_string(),
                ))
            }
        };

        if file.content.len() as u64 > MAX_UPLOAD_SIZE {
            return Err(CaixaError::Validation("File too large".to_string()));
        }

        let mime_type = file.mime_type();
        if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(CaixaError::Validation("Invalid file type".to_string()));
        }

        CategoryRepository::new(self.pool)
            .get(owner_id, category_id)
            .await?
            .ok_or_else(|| CaixaError::NotFound("Category".to_string()))?;

        let key = object_key(owner_id, now.timestamp_millis(), &file.filename);

        if let Err(e) = self.store.put(&key, &file.content, &mime_type).await {
            tracing::error!("Failed to store object {}: {}", key, e);
            return Err(CaixaError::Storage("Upload failed".to_string()));
        }

        let new_file = NewFile {
            id: Uuid::new_v4().to_string(),
            filename: file.filename,
            path: key,
            category_id: category_id.to_string(),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        match FileRepository::new(self.pool).create(owner_id, &new_file).await {
            Ok(stored) => {
                tracing::info!(
                    "User {} uploaded {} ({} bytes) to {}",
                    owner_id,
                    stored.filename,
                    file.content.len(),
                    stored.path
                );
                Ok(stored)
            }
            Err(e) => {
                tracing::warn!(
                    "Orphaned object {} left in storage, record insert failed: {}",
                    new_file.path,
                    e
                );
                Err(CaixaError::Storage("Upload failed".to_string()))
            }
        }
    }

    /// List the owner's files, newest first.
    pub async fn list_files(&self, owner_id: &str) -> Result<Vec<FileWithCategory>> {
        FileRepository::new(self.pool)
            .list_with_category(owner_id)
            .await
    }

    /// Mint a short-lived download link for one of the owner's files.
    ///
    /// Files owned by someone else are reported exactly like missing ones.
    pub async fn download_link(&self, owner_id: &str, file_id: &str) -> Result<SignedUrl> {
        let file = FileRepository::new(self.pool)
            .get(owner_id, file_id)
            .await?
            .ok_or_else(|| CaixaError::NotFound("File".to_string()))?;

        self.store
            .signed_url(&file.path, Duration::from_secs(SIGNED_URL_TTL_SECS))
            .await
            .map_err(|e| {
                tracing::error!("Failed to sign link for {}: {}", file.path, e);
                CaixaError::Storage("Failed to generate download link".to_string())
            })
    }
}
