//! Per-request identity and the provider seam that resolves it.

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::Serialize;

/// The authenticated caller, resolved fresh for every request.
///
/// `user_id` is the owner key for every category and file query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Stable user identifier.
    pub user_id: String,
    /// Email address, when the provider shares one.
    pub email: Option<String>,
    /// Display name, when the provider shares one.
    pub name: Option<String>,
}

impl Identity {
    /// Create an identity with only a user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            name: None,
        }
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Resolves the caller's identity from request headers.
///
/// Returning `None` means there is no valid session; callers must answer
/// 401 and do nothing else.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the identity carried by the request, if any.
    async fn resolve(&self, headers: &HeaderMap) -> Option<Identity>;

    /// Name of the cookie that carries the session, if the provider uses one.
    fn session_cookie(&self) -> Option<&str> {
        None
    }
}
