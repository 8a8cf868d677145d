//! Shop route handlers.
//!
//! Seller registration mirrors the customer flow: a signed activation token
//! carries the pending shop until the activation endpoint materializes it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use mandarin_core::ShopId;

use crate::db::shops::{ShopInfoUpdate, ShopRepository};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{
    RequireAdmin, RequireSeller, clear_current_seller, set_current_seller,
};
use crate::models::session::CurrentSeller;
use crate::models::shop::Shop;
use crate::services::auth::{AuthService, ShopRegistration};
use crate::state::AppState;

/// Image host folder for shop avatars.
const AVATAR_FOLDER: &str = "shop-avatars";

// =============================================================================
// Request Types
// =============================================================================

/// Seller registration payload.
#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub zip_code: String,
    pub avatar: Option<String>,
}

/// Activation payload.
#[derive(Debug, Deserialize)]
pub struct ActivationRequest {
    pub activation_token: String,
}

/// Seller login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Avatar update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar: Option<String>,
}

/// Shop profile update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateSellerInfoRequest {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: String,
    pub zip_code: String,
}

// =============================================================================
// Registration & Login
// =============================================================================

/// Handle `POST /create-shop`.
pub async fn create_shop(
    State(state): State<AppState>,
    Json(body): Json<CreateShopRequest>,
) -> Result<impl IntoResponse> {
    let avatar = match &body.avatar {
        Some(data_url) => Some(state.images().upload(data_url, AVATAR_FOLDER).await?),
        None => None,
    };

    let auth = AuthService::new(state.pool(), state.signer());
    let (email, token) = auth
        .register_shop(ShopRegistration {
            name: &body.name,
            email: &body.email,
            password: &body.password,
            phone: &body.phone,
            address: &body.address,
            zip_code: &body.zip_code,
            avatar,
        })
        .await?;

    let activation_url = format!("{}/seller/activation/{token}", state.config().base_url);
    state
        .email()
        .send_activation_email(email.as_str(), &body.name, &activation_url)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("please check your email ({}) to activate your shop", email),
        })),
    ))
}

/// Handle `POST /activation`.
pub async fn activation(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ActivationRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.signer());
    let shop = auth.activate_shop(&body.activation_token).await?;

    login_session(&session, &shop).await?;

    if let Err(e) = state
        .email()
        .send_welcome_email(shop.email.as_str(), &shop.name, &state.config().base_url)
        .await
    {
        tracing::warn!(error = %e, "Failed to send welcome email");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "shop": shop })),
    ))
}

/// Handle `POST /login-shop`.
pub async fn login_shop(
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
    let shop = auth.login_shop(email, password).await?;

    login_session(&session, &shop).await?;

    Ok(Json(json!({ "success": true, "shop": shop })))
}

/// Handle `GET /logout`.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_seller(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Json(json!({ "success": true, "message": "Log out successful" })))
}

// =============================================================================
// Profile
// =============================================================================

/// Handle `GET /get-shop`.
pub async fn get_shop(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
) -> Result<impl IntoResponse> {
    let shop = ShopRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    Ok(Json(json!({ "success": true, "shop": shop })))
}

/// Handle `GET /get-shop-info/{id}`.
pub async fn get_shop_info(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let shop = ShopRepository::new(state.pool())
        .get_by_id(ShopId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    Ok(Json(json!({ "success": true, "shop": shop })))
}

/// Handle `PUT /update-shop-avatar`.
pub async fn update_shop_avatar(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Json(body): Json<UpdateAvatarRequest>,
) -> Result<impl IntoResponse> {
    let shops = ShopRepository::new(state.pool());
    let shop = shops
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    let Some(data_url) = &body.avatar else {
        return Ok(Json(json!({ "success": true, "shop": shop })));
    };

    if let Some(old) = &shop.avatar
        && let Err(e) = state.images().delete(&old.public_id).await
    {
        tracing::warn!(public_id = %old.public_id, error = %e, "Failed to delete old avatar");
    }

    let uploaded = state.images().upload(data_url, AVATAR_FOLDER).await?;
    let shop = shops.update_avatar(current.id, Some(&uploaded)).await?;

    Ok(Json(json!({ "success": true, "shop": shop })))
}

/// Handle `PUT /update-seller-info`.
pub async fn update_seller_info(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Json(body): Json<UpdateSellerInfoRequest>,
) -> Result<impl IntoResponse> {
    let shop = ShopRepository::new(state.pool())
        .update_info(
            current.id,
            &ShopInfoUpdate {
                name: body.name,
                description: body.description,
                address: body.address,
                phone: body.phone,
                zip_code: body.zip_code,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "shop": shop })))
}

// =============================================================================
// Admin
// =============================================================================

/// Handle `GET /admin-all-sellers`.
pub async fn admin_all_sellers(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let shops = ShopRepository::new(state.pool()).list_all().await?;

    Ok(Json(json!({ "success": true, "shops": shops })))
}

/// Handle `DELETE /delete-seller/{id}`.
pub async fn delete_seller(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let shops = ShopRepository::new(state.pool());
    let shop = shops
        .get_by_id(ShopId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    if let Some(avatar) = &shop.avatar
        && let Err(e) = state.images().delete(&avatar.public_id).await
    {
        tracing::warn!(public_id = %avatar.public_id, error = %e, "Failed to delete avatar");
    }

    shops.delete(shop.id).await?;

    Ok(Json(
        json!({ "success": true, "message": "Shop deleted successfully" }),
    ))
}

// =============================================================================
// Helpers
// =============================================================================

/// Store the seller principal in the session and tag Sentry events with it.
async fn login_session(session: &Session, shop: &Shop) -> Result<()> {
    let current = CurrentSeller {
        id: shop.id,
        email: shop.email.clone(),
    };
    set_current_seller(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;
    set_sentry_user(&shop.id, Some(shop.email.as_str()));

    Ok(())
}
