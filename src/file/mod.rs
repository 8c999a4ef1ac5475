//! File management module for Caixa-Preta.
//!
//! This module provides:
//! - Owner-scoped category and file records
//! - The object storage seam and its local backend with signed links
//! - Upload validation and download link minting

mod category;
mod metadata;
mod service;
mod storage;

pub use category::{validate_category_name, Category, CategoryRepository};
pub use metadata::{FileRepository, FileWithCategory, NewFile, StoredFile};
pub use service::{FileService, UploadRequest, UploadedFile};
pub use storage::{object_key, LocalObjectStore, ObjectClaims, ObjectStore, SignedUrl};

/// Maximum upload size (5 MiB).
pub const MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

/// Lifetime of a signed download link, in seconds.
pub const SIGNED_URL_TTL_SECS: u64 = 60;

/// Maximum length for a category name (in characters).
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
