//! Product route handlers.
//!
//! Catalog CRUD for sellers, the public paginated listing, and review
//! upserts by customers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use mandarin_core::{ProductId, ShopId};

use crate::db::orders::OrderRepository;
use crate::db::products::{NewProduct, ProductRepository};
use crate::db::shops::ShopRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, RequireSeller, RequireUser};
use crate::models::product::{Product, Review};
use crate::state::AppState;

/// Image host folder for product photos.
const PRODUCT_FOLDER: &str = "products";

/// Default and maximum page sizes for the public catalog.
const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// Request Types
// =============================================================================

/// Product creation payload. Images are base64 data URLs.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Option<String>,
    pub original_price: Option<Decimal>,
    pub discount_price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Pagination query for the public catalog.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Review upsert payload.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: i32,
    pub rating: i16,
    pub comment: String,
}

// =============================================================================
// Seller Catalog
// =============================================================================

/// Handle `POST /create-product`.
pub async fn create_product(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    // The session principal can outlive a deleted shop.
    ShopRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    let mut images = Vec::with_capacity(body.images.len());
    for data_url in &body.images {
        images.push(state.images().upload(data_url, PRODUCT_FOLDER).await?);
    }

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            shop_id: current.id,
            name: body.name,
            description: body.description,
            category: body.category,
            tags: body.tags,
            original_price: body.original_price,
            discount_price: body.discount_price,
            stock: body.stock,
            images,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "product": product })),
    ))
}

/// Handle `GET /get-all-products-shop/{shop_id}`.
pub async fn get_all_products_shop(
    State(state): State<AppState>,
    Path(shop_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool())
        .list_by_shop(ShopId::new(shop_id))
        .await?;

    Ok(Json(json!({ "success": true, "products": products })))
}

/// Handle `DELETE /delete-shop-product/{id}`.
///
/// Only the owning shop may delete; product images are removed from the
/// image host first.
pub async fn delete_shop_product(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool());
    let product = products
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if product.shop_id != current.id {
        return Err(AppError::Unauthorized(
            "You can only delete your own products".to_string(),
        ));
    }

    for image in &product.images {
        if let Err(e) = state.images().delete(&image.public_id).await {
            tracing::warn!(public_id = %image.public_id, error = %e, "Failed to delete product image");
        }
    }

    products.delete(product.id).await?;

    Ok(Json(
        json!({ "success": true, "message": "Product deleted successfully" }),
    ))
}

// =============================================================================
// Public Catalog
// =============================================================================

/// Handle `GET /get-all-products`.
pub async fn get_all_products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let page_result = ProductRepository::new(state.pool())
        .list_page(limit, offset)
        .await?;

    Ok(Json(json!({
        "success": true,
        "products": page_result.products,
        "total": page_result.total,
        "page": page,
        "limit": limit,
    })))
}

// =============================================================================
// Reviews
// =============================================================================

/// Handle `PUT /create-new-review`.
///
/// Only products the caller has ordered can be reviewed. One review per
/// user per product; a second submission replaces the first. The average
/// rating is recomputed on every write.
pub async fn create_new_review(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let product_id = ProductId::new(body.product_id);
    let purchased = OrderRepository::new(state.pool())
        .list_by_user(current.id)
        .await?
        .iter()
        .any(|order| order.contains_product(product_id));
    if !purchased {
        return Err(AppError::BadRequest(
            "You can only review products you have purchased".to_string(),
        ));
    }

    let products = ProductRepository::new(state.pool());
    let product = products
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let reviewer = crate::db::users::UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut reviews: Vec<Review> = product
        .reviews
        .into_iter()
        .filter(|r| r.user_id != current.id)
        .collect();
    reviews.push(Review {
        user_id: current.id,
        user_name: reviewer.name,
        rating: body.rating,
        comment: body.comment,
        created_at: Utc::now(),
    });

    let ratings = Product::average_rating(&reviews);
    let product = products.set_reviews(product.id, &reviews, ratings).await?;

    Ok(Json(json!({ "success": true, "product": product })))
}

// =============================================================================
// Admin
// =============================================================================

/// Handle `GET /admin-all-products`.
pub async fn admin_all_products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(Json(json!({ "success": true, "products": products })))
}
