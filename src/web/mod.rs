//! Web API module for Caixa-Preta.
//!
//! This module provides the REST API behind the dashboard, the signed object
//! route of the local store, and the dashboard's static files.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
