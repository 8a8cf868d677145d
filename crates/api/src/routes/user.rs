//! User route handlers.
//!
//! Registration, activation, login, profile management, addresses, and the
//! admin listing/deletion endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use mandarin_core::{AddressId, AddressKind, UserId};

use crate::db::users::{AddressUpsert, UserRepository};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{
    RequireAdmin, RequireUser, clear_current_user, set_current_user,
};
use crate::models::session::CurrentUser;
use crate::models::user::User;
use crate::services::auth::{AuthService, UserRegistration};
use crate::state::AppState;

/// Image host folder for customer avatars.
const AVATAR_FOLDER: &str = "avatars";

// =============================================================================
// Request Types
// =============================================================================

/// Registration payload. The avatar, when present, is a base64 data URL.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

/// Activation payload.
#[derive(Debug, Deserialize)]
pub struct ActivationRequest {
    pub activation_token: String,
}

/// Login payload. Fields are optional so a missing one answers 400 with a
/// message instead of a body-rejection error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile update payload. The current password gates the change.
#[derive(Debug, Deserialize)]
pub struct UpdateUserInfoRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Avatar update payload. `None` is a no-op.
#[derive(Debug, Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar: Option<String>,
}

/// Address upsert payload.
#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    pub id: Option<i32>,
    pub kind: AddressKind,
    pub country: String,
    pub city: String,
    pub zip_code: String,
    pub address1: String,
    pub address2: Option<String>,
}

/// Password change payload.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// =============================================================================
// Registration & Login
// =============================================================================

/// Handle `POST /create-user`.
///
/// Uploads the avatar (if any), signs an activation token carrying the
/// pending account, and mails the activation link. Nothing is persisted
/// until the token comes back through `POST /activation`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    let avatar = match &body.avatar {
        Some(data_url) => Some(state.images().upload(data_url, AVATAR_FOLDER).await?),
        None => None,
    };

    let auth = AuthService::new(state.pool(), state.signer());
    let (email, token) = auth
        .register_user(UserRegistration {
            name: &body.name,
            email: &body.email,
            password: &body.password,
            phone: body.phone.as_deref(),
            avatar,
        })
        .await?;

    let activation_url = format!("{}/activation/{token}", state.config().base_url);
    state
        .email()
        .send_activation_email(email.as_str(), &body.name, &activation_url)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("please check your email ({}) to activate your account", email),
        })),
    ))
}

/// Handle `POST /activation`.
///
/// Materializes the pending account and logs the new user in.
pub async fn activation(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ActivationRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.signer());
    let user = auth.activate_user(&body.activation_token).await?;

    login_session(&session, &user).await?;

    // The welcome email is best-effort; the account exists either way.
    if let Err(e) = state
        .email()
        .send_welcome_email(user.email.as_str(), &user.name, &state.config().base_url)
        .await
    {
        tracing::warn!(error = %e, "Failed to send welcome email");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": user })),
    ))
}

/// Handle `POST /login-user`.
pub async fn login_user(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (Some(email), Some(password)) = (&body.email, &body.password) else {
        return Err(AppError::BadRequest(
            "Please provide all fields".to_string(),
        ));
    };

    let auth = AuthService::new(state.pool(), state.signer());
    let user = auth.login_user(email, password).await?;

    login_session(&session, &user).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// Handle `GET /logout`.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Json(json!({ "success": true, "message": "Log out successful" })))
}

// =============================================================================
// Profile
// =============================================================================

/// Handle `GET /get-user`.
pub async fn get_user(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let addresses = users.list_addresses(current.id).await?;

    Ok(Json(
        json!({ "success": true, "user": user, "addresses": addresses }),
    ))
}

/// Handle `GET /user-info/{id}`.
pub async fn user_info(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// Handle `PUT /update-user-info`.
///
/// Requires re-entry of the current password.
pub async fn update_user_info(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    session: Session,
    Json(body): Json<UpdateUserInfoRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.signer());
    auth.verify_user_password(current.id, &body.password)
        .await?;

    let email = mandarin_core::Email::parse(&body.email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email address: {e}")))?;

    let users = UserRepository::new(state.pool());
    let user = users
        .update_info(current.id, &body.name, &email, body.phone.as_deref())
        .await?;

    // The session carries the email, so keep it in sync.
    login_session(&session, &user).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// Handle `PUT /update-avatar`.
///
/// An empty payload is a no-op; otherwise the old image-host object is
/// deleted before the new one is uploaded.
pub async fn update_avatar(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<UpdateAvatarRequest>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let Some(data_url) = &body.avatar else {
        return Ok(Json(json!({ "success": true, "user": user })));
    };

    if let Some(old) = &user.avatar
        && let Err(e) = state.images().delete(&old.public_id).await
    {
        tracing::warn!(public_id = %old.public_id, error = %e, "Failed to delete old avatar");
    }

    let uploaded = state.images().upload(data_url, AVATAR_FOLDER).await?;
    let user = users.update_avatar(current.id, Some(&uploaded)).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// Handle `PUT /update-user-password`.
pub async fn update_user_password(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.signer());
    auth.change_user_password(
        current.id,
        &body.old_password,
        &body.new_password,
        &body.confirm_password,
    )
    .await?;

    Ok(Json(
        json!({ "success": true, "message": "Password updated successfully" }),
    ))
}

// =============================================================================
// Addresses
// =============================================================================

/// Handle `PUT /update-user-addresses`.
pub async fn update_user_addresses(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<UpdateAddressRequest>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    users
        .upsert_address(
            current.id,
            &AddressUpsert {
                id: body.id.map(AddressId::new),
                kind: body.kind,
                country: body.country,
                city: body.city,
                zip_code: body.zip_code,
                address1: body.address1,
                address2: body.address2,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(_) => AppError::BadRequest(format!(
                "{} address already exists",
                body_kind_label(body.kind)
            )),
            other => AppError::Database(other),
        })?;

    let addresses = users.list_addresses(current.id).await?;

    Ok(Json(json!({ "success": true, "addresses": addresses })))
}

/// Handle `DELETE /delete-user-address/{id}`.
///
/// Succeeds whether or not the address existed.
pub async fn delete_user_address(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    users.delete_address(current.id, AddressId::new(id)).await?;

    let addresses = users.list_addresses(current.id).await?;

    Ok(Json(json!({ "success": true, "addresses": addresses })))
}

// =============================================================================
// Admin
// =============================================================================

/// Handle `GET /admin-all-users`.
pub async fn admin_all_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool()).list_all().await?;

    Ok(Json(json!({ "success": true, "users": users })))
}

/// Handle `DELETE /delete-user/{id}`.
///
/// Deletes the avatar at the image host before removing the row.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(avatar) = &user.avatar
        && let Err(e) = state.images().delete(&avatar.public_id).await
    {
        tracing::warn!(public_id = %avatar.public_id, error = %e, "Failed to delete avatar");
    }

    users.delete(user.id).await?;

    Ok(Json(
        json!({ "success": true, "message": "User deleted successfully" }),
    ))
}

// =============================================================================
// Helpers
// =============================================================================

/// Store the principal in the session and tag Sentry events with it.
async fn login_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    };
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(())
}

/// Human label for an address kind in error messages.
fn body_kind_label(kind: AddressKind) -> &'static str {
    match kind {
        AddressKind::Default => "Default",
        AddressKind::Home => "Home",
        AddressKind::Office => "Office",
    }
}
