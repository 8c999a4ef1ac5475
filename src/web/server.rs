//! Web server for Caixa-Preta.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::auth::JwtIdentityProvider;
use crate::config::Config;
use crate::file::LocalObjectStore;
use crate::{CaixaError, Database, Result};

use super::handlers::AppState;
use super::middleware::SharedIdentityProvider;
use super::router::create_app;

/// Web server for the API and dashboard.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Identity provider.
    identity: SharedIdentityProvider,
    /// Local object store behind the signed links.
    object_store: Arc<LocalObjectStore>,
    /// Configuration.
    config: Config,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Database, object_store: LocalObjectStore) -> Result<Self> {
        let addr = format!("{}:{}", config.web.host, config.web.port)
            .parse()
            .map_err(|e| CaixaError::Config(format!("invalid web server address: {e}")))?;

        let object_store = Arc::new(object_store);
        let app_state = AppState::new(Arc::new(db), object_store.clone())
            .with_auto_provision_users(config.auth.auto_provision_users);

        let identity: SharedIdentityProvider = Arc::new(JwtIdentityProvider::new(
            &config.auth.jwt_secret,
            config.auth.session_cookie.clone(),
        ));

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            identity,
            object_store,
            config: config.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = create_app(
            self.app_state,
            self.identity,
            Some(self.object_store),
            &self.config.web,
        )
        .layer(CompressionLayer::new());

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }
}
