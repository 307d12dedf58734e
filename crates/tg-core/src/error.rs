//! # AppError
//!
//! Centralized error handling for the Tangle ecosystem.
//! Maps domain-specific failures to actionable error types.

use serde::Serialize;
use thiserror::Error;

/// One field-level validation failure, reported as an `errors` array entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self { field: field.to_string(), message: message.to_string() }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The primary error type for all tg-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing input, checked before any store access.
    #[error("validation failed: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<FieldError>),

    /// Request is well-formed but rejected (duplicate identity, unknown
    /// community code, duplicate report).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid credentials or bearer token.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Resource missing, inactive, or owned by someone else. Ownership
    /// failures deliberately share this variant so a non-owner cannot
    /// learn that the row exists.
    #[error("{0}")]
    NotFound(String),

    /// Unique field collision surfaced by the store itself.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (store, hashing). Detail is logged
    /// server-side; callers only ever see a generic message.
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        AppError::Validation(errors)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        AppError::Unauthenticated(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

/// A specialized Result type for Tangle logic.
pub type Result<T> = std::result::Result<T, AppError>;
