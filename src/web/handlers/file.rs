//! File handlers for Web API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::file::{FileService, UploadRequest, UploadedFile};
use crate::web::dto::{DownloadLinkResponse, FileResponse, UploadForm};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/files - List the caller's files, newest first.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "Files with their category", body = Vec<FileResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let files = FileService::new(state.db.pool(), state.store.as_ref())
        .list_files(&identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list files: {}", e);
            ApiError::internal("Internal error")
        })?;

    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET /api/files/:id/download - Mint a 60 second download link.
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Signed download link", body = DownloadLinkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Failed to generate download link")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(file_id): Path<String>,
) -> Result<Json<DownloadLinkResponse>, ApiError> {
    let link = FileService::new(state.db.pool(), state.store.as_ref())
        .download_link(&identity.user_id, &file_id)
        .await?;

    Ok(Json(DownloadLinkResponse::from(link)))
}

/// A body cut off at the transport limit is an oversized upload.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::debug!("Upload body over the transport limit: {}", e);
        return ApiError::bad_request("File too large");
    }

    tracing::warn!("Failed to read multipart data: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

/// POST /api/upload - Upload a file into one of the caller's categories.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded", body = FileResponse),
        (status = 400, description = "Missing file or category, file too large, or invalid file type"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User or category not found"),
        (status = 500, description = "Upload failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<FileResponse>, ApiError> {
    state.require_user(&identity).await?;

    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let content = field.bytes().await.map_err(multipart_error)?.to_vec();

                request.file = Some(UploadedFile {
                    filename,
                    content_type,
                    content,
                });
            }
            "categoryId" => {
                request.category_id = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let file = FileService::new(state.db.pool(), state.store.as_ref())
        .upload(&identity.user_id, request)
        .await?;

    Ok(Json(FileResponse::from(file)))
}
