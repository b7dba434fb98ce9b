//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The HTTP mapping lives in `api::error`.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Resource absent, or present but not visible to the caller
    #[error("Resource not found")]
    NotFound,
    /// Bad or missing field
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },
    /// Natural key already taken
    #[error("Conflict on {field}: {message}")]
    Conflict { field: String, message: String },
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// External service error
    #[error("External service error: {0}")]
    External(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Conflict {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Unique violations that slip past the explicit pre-checks still surface as conflicts
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                DomainError::conflict("non_field_errors", msg)
            }
            _ => DomainError::Database(e.to_string()),
        }
    }
}
