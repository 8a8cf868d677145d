//! Coupon repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mandarin_core::{CouponId, ShopId};

use super::{RepositoryError, map_unique_violation};
use crate::models::coupon::Coupon;

const COUPON_COLUMNS: &str =
    "id, shop_id, name, value, min_amount, max_amount, selected_product, created_at";

/// Internal row type for `PostgreSQL` coupon queries.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: i32,
    shop_id: i32,
    name: String,
    value: Decimal,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
    selected_product: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Self {
            id: CouponId::new(row.id),
            shop_id: ShopId::new(row.shop_id),
            name: row.name,
            value: row.value,
            min_amount: row.min_amount,
            max_amount: row.max_amount,
            selected_product: row.selected_product,
            created_at: row.created_at,
        }
    }
}

/// Fields for creating a coupon.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub shop_id: ShopId,
    pub name: String,
    pub value: Decimal,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub selected_product: Option<String>,
}

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new coupon.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is already in use by
    /// any shop.
    pub async fn create(&self, new_coupon: &NewCoupon) -> Result<Coupon, RepositoryError> {
        let sql = format!(
            "INSERT INTO coupons (shop_id, name, value, min_amount, max_amount, selected_product)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COUPON_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CouponRow>(&sql)
            .bind(new_coupon.shop_id)
            .bind(&new_coupon.name)
            .bind(new_coupon.value)
            .bind(new_coupon.min_amount)
            .bind(new_coupon.max_amount)
            .bind(&new_coupon.selected_product)
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "coupon code already exists"))?;

        Ok(row.into())
    }

    /// List a shop's coupons, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_shop(&self, shop_id: ShopId) -> Result<Vec<Coupon>, RepositoryError> {
        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE shop_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, CouponRow>(&sql)
            .bind(shop_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Look up a coupon by its code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Coupon>, RepositoryError> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE name = $1");
        let row = sqlx::query_as::<_, CouponRow>(&sql)
            .bind(name)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a coupon by ID, scoped to its issuing shop.
    ///
    /// # Returns
    ///
    /// Returns `true` if the coupon was deleted, `false` if it didn't exist
    /// or belongs to another shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CouponId, shop_id: ShopId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1 AND shop_id = $2")
            .bind(id)
            .bind(shop_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
