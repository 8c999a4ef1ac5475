//! Object storage for Caixa-Preta.
//!
//! This module provides the storage seam used by uploads and downloads:
//! - `ObjectStore`: write bytes under a key and mint time-limited links
//! - `LocalObjectStore`: a filesystem backend whose links are served by the
//!   `/objects/*key` route and carry a signed token bound to the key
//!
//! Objects live under their key relative to the base directory:
//! ```text
//! {base_path}/
//! ├── u1/
//! │   ├── 1705314600000-report.pdf
//! │   └── 1705314612345-scan.png
//! └── u2/
//!     └── 1705314700000-receipt.jpg
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::{CaixaError, Result};

/// A time-limited download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    /// The link itself.
    pub url: String,
    /// When the link stops working.
    pub expires_at: DateTime<Utc>,
}

/// Durable byte storage that can issue signed read links.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `content` under a new `key`.
    ///
    /// Fails if an object already exists under `key`; stored objects are
    /// never overwritten.
    async fn put(&self, key: &str, content: &[u8], content_type: &str) -> Result<()>;

    /// Mint a link granting read access to `key` for `ttl`.
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<SignedUrl>;
}

/// Build the storage key for an upload: `{user_id}/{millis}-{filename}`.
///
/// Path separators and control characters in either part become `_`, so the
/// key always has exactly two segments.
pub fn object_key(user_id: &str, millis: i64, filename: &str) -> String {
    format!(
        "{}/{}-{}",
        sanitize_segment(user_id),
        millis,
        sanitize_segment(filename)
    )
}

fn sanitize_segment(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Claims carried by an object token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectClaims {
    /// The object key the token grants access to.
    pub key: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

/// Filesystem-backed object store.
#[derive(Clone)]
pub struct LocalObjectStore {
    base_path: PathBuf,
    public_base_url: Url,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl LocalObjectStore {
    /// Create a store rooted at `base_path`.
    ///
    /// The base directory will be created if it doesn't exist. Links point
    /// at `{public_base_url}/objects/{key}`.
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: &str,
        signing_secret: &str,
    ) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        let public_base_url = Url::parse(public_base_url)
            .map_err(|e| CaixaError::Config(format!("invalid public base URL: {e}")))?;

        Ok(Self {
            base_path,
            public_base_url,
            encoding_key: EncodingKey::from_secret(signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_secret.as_bytes()),
        })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Read an object's bytes.
    pub async fn load(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key)?;

        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CaixaError::NotFound(format!("Object {key}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if an object exists.
    pub async fn exists(&self, key: &str) -> bool {
        match self.object_path(key) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Check that `token` was issued by this store for `key` and has not
    /// expired.
    pub fn verify_token(&self, key: &str, token: &str) -> Result<()> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<ObjectClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| CaixaError::Auth(format!("invalid object token: {e}")))?;

        if data.claims.key != key {
            return Err(CaixaError::Auth("object token key mismatch".to_string()));
        }

        Ok(())
    }

    fn sign(&self, key: &str, expires_at: DateTime<Utc>) -> Result<String> {
        let claims = ObjectClaims {
            key: key.to_string(),
            iat: Utc::now().timestamp() as u64,
            exp: expires_at.timestamp() as u64,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CaixaError::Storage(format!("failed to sign object token: {e}")))
    }

    fn link_for(&self, key: &str, token: &str) -> Result<Url> {
        let mut url = self.public_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CaixaError::Storage("public base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .push("objects")
            .extend(key.split('/'));
        url.query_pairs_mut().clear().append_pair("token", token);

        Ok(url)
    }

    /// Resolve a key to a path under the base directory.
    ///
    /// Only plain relative segments are accepted.
    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !plain {
            return Err(CaixaError::Storage(format!("invalid object key: {key}")));
        }

        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, content: &[u8], _content_type: &str) -> Result<()> {
        let path = self.object_path(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(CaixaError::Storage(format!("object already exists: {key}")));
            }
            Err(e) => return Err(e.into()),
        };

        let written = async {
            file.write_all(content).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove partial object {}: {}", key, rm);
            }
            return Err(e.into());
        }

        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<SignedUrl> {
        if !self.exists(key).await {
            return Err(CaixaError::Storage(format!("object missing: {key}")));
        }

        let expires_at = Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64);
        let token = self.sign(key, expires_at)?;
        let url = self.link_for(key, &token)?;

        Ok(SignedUrl {
            url: url.to_string(),
            expires_at,
        })
    }
}
