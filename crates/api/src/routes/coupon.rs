//! Coupon route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use mandarin_core::{CouponId, ShopId};

use crate::db::coupons::{CouponRepository, NewCoupon};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireSeller;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Coupon creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    pub name: String,
    pub value: Decimal,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub selected_product: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `POST /create-coupon-code`.
pub async fn create_coupon_code(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Json(body): Json<CreateCouponRequest>,
) -> Result<impl IntoResponse> {
    if body.value < Decimal::ZERO || body.value > Decimal::ONE_HUNDRED {
        return Err(AppError::BadRequest(
            "Coupon value must be a percentage between 0 and 100".to_string(),
        ));
    }

    let coupon = CouponRepository::new(state.pool())
        .create(&NewCoupon {
            shop_id: current.id,
            name: body.name,
            value: body.value,
            min_amount: body.min_amount,
            max_amount: body.max_amount,
            selected_product: body.selected_product,
        })
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(_) => {
                AppError::BadRequest("Coupon code already exists".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "coupon": coupon })),
    ))
}

/// Handle `GET /get-coupon/{shop_id}`.
///
/// Sellers can only list their own coupons.
pub async fn get_coupon(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Path(shop_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let shop_id = ShopId::new(shop_id);
    if shop_id != current.id {
        return Err(AppError::Unauthorized(
            "You can only view your own coupons".to_string(),
        ));
    }

    let coupons = CouponRepository::new(state.pool())
        .list_by_shop(shop_id)
        .await?;

    Ok(Json(json!({ "success": true, "coupons": coupons })))
}

/// Handle `GET /get-coupon-value/{name}`.
///
/// Public lookup used at checkout. A missing code answers 200 with a null
/// coupon so the frontend shows "invalid code" inline.
pub async fn get_coupon_value(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let coupon = CouponRepository::new(state.pool()).get_by_name(&name).await?;

    Ok(Json(json!({ "success": true, "coupon": coupon })))
}

/// Handle `DELETE /delete-coupon/{id}`.
pub async fn delete_coupon(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let deleted = CouponRepository::new(state.pool())
        .delete(CouponId::new(id), current.id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Coupon not found".to_string()));
    }

    Ok(Json(
        json!({ "success": true, "message": "Coupon deleted successfully" }),
    ))
}
