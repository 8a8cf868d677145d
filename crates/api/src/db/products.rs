//! Product repository for database operations.
//!
//! Reviews live on the product row as a JSONB array; a review write replaces
//! the whole array together with the recomputed average rating.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use mandarin_core::{ProductId, ShopId};

use super::RepositoryError;
use crate::models::ImageRef;
use crate::models::product::{Product, Review};

const PRODUCT_COLUMNS: &str = "id, shop_id, name, description, category, tags, original_price, \
                               discount_price, stock, images, ratings, reviews, sold_out, \
                               created_at";

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    shop_id: i32,
    name: String,
    description: String,
    category: String,
    tags: Option<String>,
    original_price: Option<Decimal>,
    discount_price: Decimal,
    stock: i32,
    images: Json<Vec<ImageRef>>,
    ratings: Option<Decimal>,
    reviews: Json<Vec<Review>>,
    sold_out: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            shop_id: ShopId::new(row.shop_id),
            name: row.name,
            description: row.description,
            category: row.category,
            tags: row.tags,
            original_price: row.original_price,
            discount_price: row.discount_price,
            stock: row.stock,
            images: row.images.0,
            ratings: row.ratings,
            reviews: row.reviews.0,
            sold_out: row.sold_out,
            created_at: row.created_at,
        }
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub shop_id: ShopId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Option<String>,
    pub original_price: Option<Decimal>,
    pub discount_price: Decimal,
    pub stock: i32,
    pub images: Vec<ImageRef>,
}

/// One page of the paginated catalog listing.
#[derive(Debug)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails. A missing
    /// shop surfaces as a foreign key violation.
    pub async fn create(&self, new_product: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products
                 (shop_id, name, description, category, tags, original_price, discount_price,
                  stock, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(new_product.shop_id)
            .bind(&new_product.name)
            .bind(&new_product.description)
            .bind(&new_product.category)
            .bind(&new_product.tags)
            .bind(new_product.original_price)
            .bind(new_product.discount_price)
            .bind(new_product.stock)
            .bind(Json(&new_product.images))
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// List a shop's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_shop(&self, shop_id: ShopId) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE shop_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(shop_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List one page of the full catalog, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_page(&self, limit: i64, offset: i64) -> Result<ProductPage, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(ProductPage {
            products: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// List the entire catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, ProductRow>(&sql).fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Replace a product's review list and average rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn set_reviews(
        &self,
        id: ProductId,
        reviews: &[Review],
        ratings: Option<Decimal>,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products SET reviews = $2, ratings = $3
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(Json(reviews))
            .bind(ratings)
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Move `quantity` units from stock to the sold counter.
    ///
    /// `quantity` may be negative to restock after a refund. Missing
    /// products are ignored so a shipped order whose product was deleted
    /// still transitions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn adjust_stock(
        &self,
        id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE products SET stock = stock - $2, sold_out = sold_out + $2 WHERE id = $1",
        )
        .bind(id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a product by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
