//! Admin role management commands.
//!
//! Admin is a role on regular user accounts, so promotion targets a user
//! that already registered and activated through the API.

use sqlx::PgPool;
use thiserror::Error;

use mandarin_core::UserRole;

use super::MissingEnvVar;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No activated user holds this email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),
}

/// Set a user's role by email.
///
/// # Errors
///
/// Returns `AdminError::UserNotFound` if no activated user holds the email.
pub async fn set_role(email: &str, role: UserRole) -> Result<(), AdminError> {
    // Basic email validation
    if !email.contains('@') || !email.contains('.') {
        return Err(AdminError::InvalidEmail(email.to_owned()));
    }

    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let result = sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE email = $1")
        .bind(email)
        .bind(role.to_string())
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::UserNotFound(email.to_owned()));
    }

    tracing::info!("Role updated: {} is now {}", email, role);
    Ok(())
}
