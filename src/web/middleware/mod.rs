//! Middleware for Web API.

pub mod auth;
pub mod cors;

pub use auth::{identity_layer, AuthUser, SharedIdentityProvider};
pub use cors::create_cors_layer;
