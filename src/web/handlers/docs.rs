//! OpenAPI document for the `/api` routes.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::dto::{
    CategoryRef, CategoryResponse, CreateCategoryRequest, DownloadLinkResponse, FileResponse,
    MeResponse, UploadForm,
};

/// OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Caixa-Preta API",
        description = "Personal file box with categories and signed download links"
    ),
    paths(
        super::auth::me,
        super::auth::logout,
        super::category::list_categories,
        super::category::create_category,
        super::file::list_files,
        super::file::download_file,
        super::file::upload_file,
    ),
    components(schemas(
        MeResponse,
        CategoryResponse,
        CategoryRef,
        CreateCategoryRequest,
        FileResponse,
        DownloadLinkResponse,
        UploadForm,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Session"),
        (name = "categories", description = "Categories"),
        (name = "files", description = "Uploads, listings and download links")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
