//! Error types for card_server

use std::fmt;

use card_common::ValidationErrors;

/// Unified error type for store and request-handling operations
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed
    Database(rusqlite::Error),
    /// Request body failed field validation
    Validation(ValidationErrors),
    /// Malformed request parameter (bad number, unknown sort field, ...)
    BadRequest(String),
    /// No card with the given id
    NotFound(i64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            StoreError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            StoreError::NotFound(id) => write!(f, "Card {} not found", id),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            StoreError::Validation(e) => Some(e),
            StoreError::BadRequest(_) => None,
            StoreError::NotFound(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}

/// Result alias for card_server operations
pub type Result<T> = std::result::Result<T, StoreError>;
