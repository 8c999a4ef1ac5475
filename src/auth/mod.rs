//! Authentication module for Caixa-Preta.
//!
//! Sign-in happens at an external identity provider. This module only turns
//! an inbound request into an [`Identity`], through the pluggable
//! [`IdentityProvider`] trait.

mod identity;
mod jwt;

pub use identity::{Identity, IdentityProvider};
pub use jwt::{encode_session_token, JwtIdentityProvider, SessionClaims};
