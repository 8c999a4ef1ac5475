//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::WebConfig;
use crate::file::{LocalObjectStore, MAX_UPLOAD_SIZE};

use super::handlers::{
    create_category, download_file, get_object, list_categories, list_files, logout, me,
    upload_file, ApiDoc, AppState,
};
use super::middleware::{create_cors_layer, identity_layer, SharedIdentityProvider};

/// Request body limit for uploads: room for a file over the cap plus
/// multipart framing, so size is judged by the upload check.
pub const UPLOAD_BODY_LIMIT: usize = 2 * MAX_UPLOAD_SIZE as usize;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    identity: SharedIdentityProvider,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/categories", get(list_categories).post(create_category))
        .route("/files", get(list_files))
        .route("/files/:id/download", get(download_file))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let provider = identity.clone();
                    identity_layer(provider, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create the router serving signed links from the local object store.
pub fn create_object_router(store: Arc<LocalObjectStore>) -> Router {
    Router::new()
        .route("/objects/*key", get(get_object))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create the dashboard router, if the static directory exists.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    if !Path::new(static_path).is_dir() {
        tracing::warn!("Static path {} not found, dashboard disabled", static_path);
        return None;
    }

    Some(Router::new().fallback_service(ServeDir::new(static_path)))
}

/// Assemble the whole application.
pub fn create_app(
    app_state: Arc<AppState>,
    identity: SharedIdentityProvider,
    object_store: Option<Arc<LocalObjectStore>>,
    web_config: &WebConfig,
) -> Router {
    let mut router = create_router(app_state, identity, &web_config.cors_origins)
        .merge(create_health_router())
        .merge(create_swagger_router());

    if let Some(store) = object_store {
        router = router.merge(create_object_router(store));
    }

    if web_config.serve_static {
        if let Some(static_router) = create_static_router(&web_config.static_path) {
            router = router.merge(static_router);
        }
    }

    router
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
