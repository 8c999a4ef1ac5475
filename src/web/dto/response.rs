//! Response DTOs for Web API.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Identity;
use crate::file::{Category, FileWithCategory, SignedUrl, StoredFile};

/// Current session.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    /// User ID.
    pub id: String,
    /// Email, when the identity provider shares one.
    pub email: Option<String>,
    /// Display name, when the identity provider shares one.
    pub name: Option<String>,
}

impl From<Identity> for MeResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            email: identity.email,
            name: identity.name,
        }
    }
}

/// Category response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Category ID.
    pub id: String,
    /// Category name.
    pub name: String,
    /// Owning user.
    pub user_id: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            user_id: c.user_id,
        }
    }
}

/// Category attached to a file listing entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRef {
    /// Category ID.
    pub id: String,
    /// Category name.
    pub name: String,
}

/// File record response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File ID.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Object storage key.
    pub path: String,
    /// Category ID.
    pub category_id: String,
    /// Owning user.
    pub user_id: String,
    /// Upload time (RFC3339).
    pub created_at: String,
    /// The file's category; omitted from upload responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

impl From<StoredFile> for FileResponse {
    fn from(f: StoredFile) -> Self {
        Self {
            id: f.id,
            filename: f.filename,
            path: f.path,
            category_id: f.category_id,
            user_id: f.user_id,
            created_at: f.created_at,
            category: None,
        }
    }
}

impl From<FileWithCategory> for FileResponse {
    fn from(f: FileWithCategory) -> Self {
        let category = f.category_name.map(|name| CategoryRef {
            id: f.file.category_id.clone(),
            name,
        });

        Self {
            category,
            ..Self::from(f.file)
        }
    }
}

/// Download link response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLinkResponse {
    /// Signed URL.
    pub url: String,
    /// When the link expires (RFC3339).
    pub expires_at: String,
}

impl From<SignedUrl> for DownloadLinkResponse {
    fn from(s: SignedUrl) -> Self {
        Self {
            url: s.url,
            expires_at: rfc3339_millis(&s.expires_at),
        }
    }
}

fn rfc3339_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
