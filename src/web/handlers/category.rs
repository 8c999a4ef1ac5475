//! Category handlers for Web API.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::file::{validate_category_name, CategoryRepository};
use crate::web::dto::{CategoryResponse, CreateCategoryRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::CaixaError;

/// GET /api/categories - List the caller's categories by name.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories sorted by name", body = Vec<CategoryResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    state.require_user(&identity).await?;

    let categories = CategoryRepository::new(state.db.pool())
        .list(&identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {}", e);
            ApiError::internal("Internal error")
        })?;

    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// POST /api/categories - Create a category.
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Name required or category already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    payload: Result<ValidatedJson<CreateCategoryRequest>, ApiError>,
) -> Result<Json<CategoryResponse>, ApiError> {
    state.require_user(&identity).await?;

    // The body is only judged once the caller is known.
    let ValidatedJson(req) = payload?;
    let name = validate_category_name(req.name.as_deref())?;

    let category = CategoryRepository::new(state.db.pool())
        .create(&identity.user_id, &name)
        .await
        .map_err(|e| match e {
            CaixaError::Conflict(_) => ApiError::from(e),
            e => {
                tracing::error!("Failed to create category: {}", e);
                ApiError::internal("Internal error")
            }
        })?;

    tracing::info!(
        "User {} created category {} ({})",
        identity.user_id,
        category.name,
        category.id
    );

    Ok(Json(CategoryResponse::from(category)))
}
