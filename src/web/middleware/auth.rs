//! Identity middleware and extractor.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{Identity, IdentityProvider};
use crate::web::error::ApiError;

/// Shared identity provider, as stored in request extensions.
pub type SharedIdentityProvider = Arc<dyn IdentityProvider>;

/// Extractor for the authenticated caller.
///
/// Resolves the identity from the request through the provider injected by
/// [`identity_layer`]. No identity means 401 and the handler never runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let provider = parts
            .extensions
            .get::<SharedIdentityProvider>()
            .cloned()
            .ok_or_else(|| ApiError::internal("Identity provider not configured"))?;

        provider
            .resolve(&parts.headers)
            .await
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

/// Middleware function to inject the identity provider into request extensions.
pub async fn identity_layer(
    provider: SharedIdentityProvider,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(provider);
    next.run(request).await
}
