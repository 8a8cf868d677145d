//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::activation::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mandarin_core::EmailError),

    /// Invalid credentials (wrong password or account not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account not found.
    #[error("account not found")]
    NotFound,

    /// An activated account with this email already exists.
    #[error("account already exists")]
    AlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// New password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Re-entered current password is wrong.
    ///
    /// Distinct from `InvalidCredentials`: the caller is already logged in,
    /// so this is a validation failure rather than an auth failure.
    #[error("wrong password")]
    WrongPassword,

    /// Activation token invalid or expired.
    #[error("activation token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token signing error: {0}")]
    TokenSigning(#[from] serde_json::Error),
}
