//! Authentication middleware and extractors.
//!
//! Provides extractors for the three access levels: logged-in customer,
//! logged-in seller, and admin. All rejections are JSON envelopes so the
//! frontend handles them uniformly.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use mandarin_core::UserRole;

use crate::models::session::{CurrentSeller, CurrentUser, keys};

/// Extractor that requires a logged-in customer.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Extractor that requires a logged-in customer with the admin role.
pub struct RequireAdmin(pub CurrentUser);

/// Extractor that requires a logged-in seller.
pub struct RequireSeller(pub CurrentSeller);

/// Error returned when a request fails an authentication gate.
pub enum AuthRejection {
    /// Not logged in (or logged in as the wrong account kind).
    Unauthorized(&'static str),
    /// Logged in but lacking the required role.
    Forbidden(&'static str),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message),
        };

        (
            status,
            Json(json!({ "success": false, "message": message })),
        )
            .into_response()
    }
}

/// Read a session value, treating a missing session or key as absent.
async fn session_value<T: serde::de::DeserializeOwned>(parts: &Parts, key: &str) -> Option<T> {
    let session = parts.extensions.get::<Session>()?;
    session.get::<T>(key).await.ok().flatten()
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user: CurrentUser = session_value(parts, keys::CURRENT_USER)
            .await
            .ok_or(AuthRejection::Unauthorized("please login to continue"))?;

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            return Err(AuthRejection::Forbidden("admin access required"));
        }

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequireSeller
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let seller: CurrentSeller = session_value(parts, keys::CURRENT_SELLER)
            .await
            .ok_or(AuthRejection::Unauthorized("seller login required"))?;

        Ok(Self(seller))
    }
}

/// Helper to set the current customer in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to clear the current customer from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    Ok(())
}

/// Helper to set the current seller in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_seller(
    session: &Session,
    seller: &CurrentSeller,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_SELLER, seller).await
}

/// Helper to clear the current seller from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_seller(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentSeller>(keys::CURRENT_SELLER).await?;
    Ok(())
}
