//! Error types for Caixa-Preta.

use thiserror::Error;

/// Common error type for Caixa-Preta.
#[derive(Error, Debug)]
pub enum CaixaError {
    /// Database error.
    ///
    /// Wraps any sqlx failure that is not a uniqueness violation.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (no or invalid session).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found, or not owned by the caller.
    #[error("{0} not found")]
    NotFound(String),

    /// A store constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Object storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for CaixaError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                CaixaError::Conflict(db_err.message().to_string())
            }
            _ => CaixaError::Database(e.to_string()),
        }
    }
}

/// Result type alias for Caixa-Preta operations.
pub type Result<T> = std::result::Result<T, CaixaError>;
