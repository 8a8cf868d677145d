//! Order route handlers.
//!
//! Checkout splits the cart by shop into one order each. Sellers drive the
//! status lifecycle; stock and shop balances move on the shipped and
//! delivered transitions.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

use mandarin_core::{OrderId, OrderStatus, ProductId, ShopId, UserId};

use crate::db::orders::{NewOrder, OrderRepository};
use crate::db::products::ProductRepository;
use crate::db::shops::ShopRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, RequireSeller, RequireUser};
use crate::models::ImageRef;
use crate::models::order::{Order, OrderItem, ShippingAddress};
use crate::state::AppState;

/// Platform fee withheld from a delivered order before crediting the shop.
const SERVICE_CHARGE_PERCENT: Decimal = Decimal::TEN;

// =============================================================================
// Request Types
// =============================================================================

/// One cart line at checkout.
#[derive(Debug, Deserialize)]
pub struct CartItem {
    pub product_id: i32,
    pub shop_id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub image: Option<ImageRef>,
}

/// Checkout payload.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub cart: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Status update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// =============================================================================
// Checkout
// =============================================================================

/// Handle `POST /create-order`.
///
/// Groups the cart by shop and creates one order per shop. Each order's
/// total is the sum of its own lines.
pub async fn create_order(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    if body.cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let mut by_shop: BTreeMap<i32, Vec<OrderItem>> = BTreeMap::new();
    for item in body.cart {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(
                "Item quantity must be positive".to_string(),
            ));
        }
        by_shop.entry(item.shop_id).or_default().push(OrderItem {
            product_id: ProductId::new(item.product_id),
            name: item.name,
            quantity: item.quantity,
            price: item.price,
            image: item.image,
        });
    }

    let orders_repo = OrderRepository::new(state.pool());
    let mut orders = Vec::with_capacity(by_shop.len());
    for (shop_id, items) in by_shop {
        let total_price: Decimal = items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum();

        let order = orders_repo
            .create(&NewOrder {
                user_id: current.id,
                shop_id: ShopId::new(shop_id),
                items,
                total_price,
                shipping_address: body.shipping_address.clone(),
                paid_at: body.paid_at,
            })
            .await?;
        orders.push(order);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "orders": orders })),
    ))
}

// =============================================================================
// Listings
// =============================================================================

/// Handle `GET /get-all-orders/{user_id}`.
pub async fn get_all_orders(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_by_user(UserId::new(user_id))
        .await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// Handle `GET /get-seller-all-orders/{shop_id}`.
pub async fn get_seller_all_orders(
    State(state): State<AppState>,
    Path(shop_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_by_shop(ShopId::new(shop_id))
        .await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

// =============================================================================
// Status Lifecycle
// =============================================================================

/// Handle `PUT /update-order-status/{id}`.
///
/// Sellers only advance orders to shipped or delivered; the refund statuses
/// have their own endpoints. Transitions are forward-only so stock moves
/// once (processing to shipped) and the balance is credited once (shipped
/// to delivered).
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Path(id): Path<i32>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    if !matches!(body.status, OrderStatus::Shipped | OrderStatus::Delivered) {
        return Err(AppError::BadRequest(
            "Invalid status transition".to_string(),
        ));
    }

    let orders_repo = OrderRepository::new(state.pool());
    let order = seller_order(&orders_repo, OrderId::new(id), current.id).await?;

    if !order.status.can_transition_to(body.status) {
        return Err(AppError::BadRequest(
            "Invalid status transition".to_string(),
        ));
    }

    if body.status == OrderStatus::Shipped {
        adjust_stock_for(&state, &order, 1).await?;
    }

    if body.status == OrderStatus::Delivered {
        let earnings = order.total_price
            * (Decimal::ONE_HUNDRED - SERVICE_CHARGE_PERCENT)
            / Decimal::ONE_HUNDRED;
        ShopRepository::new(state.pool())
            .credit_balance(current.id, earnings)
            .await?;
    }

    let order = orders_repo.update_status(order.id, body.status).await?;

    Ok(Json(json!({ "success": true, "order": order })))
}

/// Handle `PUT /order-refund/{id}`.
///
/// The customer asks for a refund; the order moves to processing-refund
/// until the seller responds. Only delivered orders qualify, which also
/// guarantees their stock was decremented at shipping.
pub async fn order_refund(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let orders_repo = OrderRepository::new(state.pool());
    let order = orders_repo
        .get_by_id(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != current.id {
        return Err(AppError::Unauthorized(
            "You can only refund your own orders".to_string(),
        ));
    }

    if !order.status.can_transition_to(OrderStatus::ProcessingRefund) {
        return Err(AppError::BadRequest(
            "Invalid status transition".to_string(),
        ));
    }

    let order = orders_repo
        .update_status(order.id, OrderStatus::ProcessingRefund)
        .await?;

    Ok(Json(json!({
        "success": true,
        "order": order,
        "message": "Order refund request submitted",
    })))
}

/// Handle `PUT /order-refund-success/{id}`.
///
/// Seller approval restocks every line of the order. Only orders with a
/// pending refund request can be approved, so restocking fires once.
pub async fn order_refund_success(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let orders_repo = OrderRepository::new(state.pool());
    let order = seller_order(&orders_repo, OrderId::new(id), current.id).await?;

    if !order.status.can_transition_to(OrderStatus::RefundApproved) {
        return Err(AppError::BadRequest(
            "Invalid status transition".to_string(),
        ));
    }

    adjust_stock_for(&state, &order, -1).await?;

    let order = orders_repo
        .update_status(order.id, OrderStatus::RefundApproved)
        .await?;

    Ok(Json(json!({
        "success": true,
        "order": order,
        "message": "Order refund approved",
    })))
}

// =============================================================================
// Admin
// =============================================================================

/// Handle `GET /admin-all-orders`.
pub async fn admin_all_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

// =============================================================================
// Helpers
// =============================================================================

/// Load an order, requiring it to belong to the seller's shop.
async fn seller_order(
    orders: &OrderRepository<'_>,
    id: OrderId,
    shop_id: ShopId,
) -> Result<Order> {
    let order = orders
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.shop_id != shop_id {
        return Err(AppError::Unauthorized(
            "You can only manage your own orders".to_string(),
        ));
    }

    Ok(order)
}

/// Move stock for every line of an order. `direction` is `1` on shipping
/// (stock down, sold up) and `-1` on a refund (stock back up).
async fn adjust_stock_for(state: &AppState, order: &Order, direction: i32) -> Result<()> {
    let products = ProductRepository::new(state.pool());
    for item in &order.items {
        products
            .adjust_stock(item.product_id, item.quantity * direction)
            .await?;
    }

    Ok(())
}
