//! Test helpers for the HTTP integration tests.
//!
//! Builds the full application over an in-memory database and a temporary
//! object store, and mints session tokens the way the identity provider does.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use caixa_preta::auth::{encode_session_token, Identity, SessionClaims};
use caixa_preta::config::WebConfig;
use caixa_preta::db::{NewUser, UserRepository};
use caixa_preta::file::{CategoryRepository, LocalObjectStore};
use caixa_preta::web::middleware::SharedIdentityProvider;
use caixa_preta::web::{create_app, AppState};
use caixa_preta::{Database, JwtIdentityProvider};

/// Secret shared with the identity provider in tests.
pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Secret the object store signs links with in tests.
pub const SIGNING_SECRET: &str = "test-signing-key-for-testing-only";

/// Public base URL of signed links in tests.
pub const PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// A running application under test.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<Database>,
    pub store: Arc<LocalObjectStore>,
    _storage_dir: TempDir,
}

/// Create a test application without user provisioning.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(false).await
}

/// Create a test application.
pub async fn create_test_app_with(auto_provision_users: bool) -> TestApp {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );

    let storage_dir = TempDir::new().expect("Failed to create storage dir");
    let store = Arc::new(
        LocalObjectStore::new(storage_dir.path(), PUBLIC_BASE_URL, SIGNING_SECRET)
            .expect("Failed to create object store"),
    );

    let app_state = Arc::new(
        AppState::new(db.clone(), store.clone()).with_auto_provision_users(auto_provision_users),
    );
    let identity: SharedIdentityProvider =
        Arc::new(JwtIdentityProvider::new(JWT_SECRET, "caixa_session"));

    let web_config = WebConfig {
        serve_static: false,
        ..Default::default()
    };

    let router = create_app(app_state, identity, Some(store.clone()), &web_config);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        store,
        _storage_dir: storage_dir,
    }
}

/// Mint a session token for `user_id`, valid for an hour.
pub fn token_for(user_id: &str) -> String {
    token_for_identity(&Identity::new(user_id))
}

/// Mint a session token for an identity, valid for an hour.
pub fn token_for_identity(identity: &Identity) -> String {
    encode_session_token(JWT_SECRET, &SessionClaims::for_identity(identity, 3600))
        .expect("Failed to sign session token")
}

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", token_for(user_id))
}

/// Insert a user row.
pub async fn create_user(db: &Database, user_id: &str) {
    UserRepository::new(db.pool())
        .create(&NewUser::new(user_id).with_email(format!("{user_id}@example.com")))
        .await
        .expect("Failed to create user");
}

/// Insert a category directly and return its ID.
pub async fn create_category(db: &Database, user_id: &str, name: &str) -> String {
    CategoryRepository::new(db.pool())
        .create(user_id, name)
        .await
        .expect("Failed to create category")
        .id
}

/// Build an upload form.
pub fn upload_form(
    filename: &str,
    mime_type: &str,
    content: Vec<u8>,
    category_id: &str,
) -> MultipartForm {
    MultipartForm::new()
        .add_text("categoryId", category_id.to_string())
        .add_part(
            "file",
            Part::bytes(content)
                .file_name(filename.to_string())
                .mime_type(mime_type.to_string()),
        )
}

/// Path and query of an absolute signed URL, for requests to the test server.
pub fn local_path(url: &str) -> String {
    let url = url::Url::parse(url).expect("Invalid signed URL");
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}
