//! Caixa-Preta - personal file box
//!
//! Signed-in users file uploads into their own categories and fetch them back
//! through short-lived signed download links.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{Identity, IdentityProvider, JwtIdentityProvider};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{CaixaError, Result};
