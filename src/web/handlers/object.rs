//! Signed object retrieval for the local object store.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::file::LocalObjectStore;
use crate::web::error::ApiError;
use crate::CaixaError;

/// Query parameters for a signed object link.
#[derive(Debug, Deserialize)]
pub struct ObjectTokenQuery {
    /// Token minted with the link.
    pub token: Option<String>,
}

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters (CR and LF included) are dropped and quotes and
/// backslashes replaced in the plain `filename` parameter. Anything
/// non-ASCII also gets an RFC 5987 `filename*`.
fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename
            .chars()
            .any(|c| c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();
    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// The original filename part of a `{user}/{millis}-{filename}` key.
fn display_name(key: &str) -> &str {
    let last = key.rsplit('/').next().unwrap_or(key);
    last.split_once('-').map(|(_, name)| name).unwrap_or(last)
}

/// GET /objects/*key?token=... - Serve an object through a signed link.
pub async fn get_object(
    State(store): State<Arc<LocalObjectStore>>,
    Path(key): Path<String>,
    Query(query): Query<ObjectTokenQuery>,
) -> Result<Response<Body>, ApiError> {
    let token = query
        .token
        .ok_or_else(|| ApiError::forbidden("Invalid or expired link"))?;

    store.verify_token(&key, &token).map_err(|e| {
        tracing::debug!("Object token rejected for {}: {}", key, e);
        ApiError::forbidden("Invalid or expired link")
    })?;

    let content = store.load(&key).await.map_err(|e| match e {
        CaixaError::NotFound(_) => ApiError::not_found("Object not found"),
        e => {
            tracing::error!("Failed to read object {}: {}", key, e);
            ApiError::internal("Internal error")
        }
    })?;

    let mime = mime_guess::from_path(&key).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(display_name(&key)),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}
