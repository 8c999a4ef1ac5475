//! API handlers for the Caixa-Preta web API.

pub mod auth;
pub mod category;
pub mod docs;
pub mod file;
pub mod object;

pub use auth::*;
pub use category::*;
pub use docs::ApiDoc;
pub use file::*;
pub use object::*;

use std::sync::Arc;

use crate::auth::Identity;
use crate::db::{NewUser, User, UserRepository};
use crate::file::ObjectStore;
use crate::web::error::ApiError;
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool.
    pub db: Arc<Database>,
    /// Object store for uploads and download links.
    pub store: Arc<dyn ObjectStore>,
    /// Create missing user rows for verified identities.
    pub auto_provision_users: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            db,
            store,
            auto_provision_users: false,
        }
    }

    /// Enable or disable user provisioning.
    pub fn with_auto_provision_users(mut self, enabled: bool) -> Self {
        self.auto_provision_users = enabled;
        self
    }

    /// Look up the user row behind `identity`.
    ///
    /// Answers 404 "User not found" unless provisioning is enabled, in which
    /// case the row is created.
    pub async fn require_user(&self, identity: &Identity) -> Result<User, ApiError> {
        let repo = UserRepository::new(self.db.pool());

        let user = repo.get_by_id(&identity.user_id).await.map_err(|e| {
            tracing::error!("Failed to get user: {}", e);
            ApiError::internal("Internal error")
        })?;

        match user {
            Some(user) => Ok(user),
            None if self.auto_provision_users => {
                let mut new_user = NewUser::new(&identity.user_id);
                if let Some(ref email) = identity.email {
                    new_user = new_user.with_email(email);
                }
                if let Some(ref name) = identity.name {
                    new_user = new_user.with_name(name);
                }

                let user = repo.ensure(&new_user).await.map_err(|e| {
                    tracing::error!("Failed to provision user: {}", e);
                    ApiError::internal("Internal error")
                })?;
                tracing::info!("Provisioned user {}", user.id);
                Ok(user)
            }
            None => Err(ApiError::not_found("User not found")),
        }
    }
}
