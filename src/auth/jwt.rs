//! Identity provider backed by HS256 session tokens.
//!
//! The external identity provider signs a token for the signed-in user with a
//! shared secret. The token arrives either as `Authorization: Bearer ...` or
//! in the session cookie.

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::identity::{Identity, IdentityProvider};
use crate::{CaixaError, Result};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

impl SessionClaims {
    /// Claims for `identity`, valid for `ttl_secs` from now.
    pub fn for_identity(identity: &Identity, ttl_secs: u64) -> Self {
        let now = chrono::Utc::now().timestamp() as u64;
        Self {
            sub: identity.user_id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            iat: now,
            exp: now + ttl_secs,
        }
    }
}

/// Sign session claims with the shared secret.
pub fn encode_session_token(secret: &str, claims: &SessionClaims) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CaixaError::Auth(format!("failed to sign session token: {e}")))
}

/// Verifies session tokens signed with a shared secret.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    session_cookie: String,
}

impl JwtIdentityProvider {
    /// Create a provider from the shared secret and the session cookie name.
    pub fn new(secret: &str, session_cookie: impl Into<String>) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            session_cookie: session_cookie.into(),
        }
    }

    /// Bearer token first, then the session cookie.
    fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string());

        bearer.or_else(|| {
            CookieJar::from_headers(headers)
                .get(&self.session_cookie)
                .map(|c| c.value().to_string())
        })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = self.token_from_headers(headers)?;

        match decode::<SessionClaims>(&token, &self.decoding_key, &self.validation) {
            Ok(data) if !data.claims.sub.is_empty() => Some(Identity {
                user_id: data.claims.sub,
                email: data.claims.email,
                name: data.claims.name,
            }),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                None
            }
        }
    }

    fn session_cookie(&self) -> Option<&str> {
        Some(&self.session_cookie)
    }
}
