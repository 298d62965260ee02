//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation failures carry a
//! [`ValidationError`] describing the offending field so the API layer can surface it
//! without ever reaching the database.

use crate::core::validation::ValidationError;
use thiserror::Error;

/// Errors produced by configuration, persistence, validation and authentication.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Any failure reported by the database layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Input rejected before it reached the database
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Row missing or owned by another user
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Email/password pair did not match an account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Sign-up or email change collided with an existing account
    #[error("An account already exists for '{email}'")]
    EmailTaken {
        /// The conflicting address
        email: String,
    },

    /// No session token, or a token that does not exist
    #[error("Authentication required")]
    Unauthorized,

    /// The session token exists but is past its expiry
    #[error("Session expired")]
    SessionExpired,

    /// Hashing or verifying a password failed for a reason other than a mismatch
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] keyed by any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<password_hash::Error> for Error {
    fn from(value: password_hash::Error) -> Self {
        Self::PasswordHash(value.to_string())
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
