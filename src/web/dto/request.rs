//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::no_control_chars;

/// Create category request.
///
/// A missing or blank name is reported as "Name required" by the handler.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    /// Category name.
    #[serde(default)]
    #[validate(
        length(max = 100, message = "Name is too long"),
        custom(function = "no_control_chars")
    )]
    pub name: Option<String>,
}

/// Multipart form accepted by the upload endpoint. Documentation only.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadForm {
    /// The file: PDF, JPEG or PNG, at most 5 MiB.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// ID of one of the caller's categories.
    pub category_id: String,
}
