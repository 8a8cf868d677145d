//! Shop repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use mandarin_core::{Email, ShopId};

use super::{RepositoryError, map_unique_violation};
use crate::models::ImageRef;
use crate::models::shop::Shop;

const SHOP_COLUMNS: &str = "id, name, email, phone, address, zip_code, description, avatar, \
                            available_balance, created_at, updated_at";

/// Internal row type for `PostgreSQL` shop queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: i32,
    name: String,
    email: String,
    phone: String,
    address: String,
    zip_code: String,
    description: Option<String>,
    avatar: Option<Json<ImageRef>>,
    available_balance: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShopRow> for Shop {
    type Error = RepositoryError;

    fn try_from(row: ShopRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ShopId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            address: row.address,
            zip_code: row.zip_code,
            description: row.description,
            avatar: row.avatar.map(|Json(img)| img),
            available_balance: row.available_balance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields for creating a shop (the materialized activation payload).
#[derive(Debug, Clone)]
pub struct NewShop {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub zip_code: String,
    pub avatar: Option<ImageRef>,
}

/// Editable shop profile fields.
#[derive(Debug, Clone)]
pub struct ShopInfoUpdate {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: String,
    pub zip_code: String,
}

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_shop: &NewShop) -> Result<Shop, RepositoryError> {
        let sql = format!(
            "INSERT INTO shops (name, email, password_hash, phone, address, zip_code, avatar)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SHOP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(&new_shop.name)
            .bind(&new_shop.email)
            .bind(&new_shop.password_hash)
            .bind(&new_shop.phone)
            .bind(&new_shop.address)
            .bind(&new_shop.zip_code)
            .bind(new_shop.avatar.as_ref().map(Json))
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "email already exists"))?;

        row.try_into()
    }

    /// Get a shop by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1");
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a shop and its password hash by email.
    ///
    /// Returns `None` if no such shop exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(Shop, String)>, RepositoryError> {
        let sql = format!("SELECT {SHOP_COLUMNS}, password_hash FROM shops WHERE email = $1");
        let row = sqlx::query_as::<_, ShopWithPasswordRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let password_hash = row.password_hash.clone();
        let shop: Shop = row.shop.try_into()?;
        Ok(Some((shop, password_hash)))
    }

    /// Update a shop's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    pub async fn update_info(
        &self,
        id: ShopId,
        update: &ShopInfoUpdate,
    ) -> Result<Shop, RepositoryError> {
        let sql = format!(
            "UPDATE shops
             SET name = $2, description = $3, address = $4, phone = $5, zip_code = $6,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {SHOP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id)
            .bind(&update.name)
            .bind(&update.description)
            .bind(&update.address)
            .bind(&update.phone)
            .bind(&update.zip_code)
            .fetch_optional(self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Replace a shop's avatar reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    pub async fn update_avatar(
        &self,
        id: ShopId,
        avatar: Option<&ImageRef>,
    ) -> Result<Shop, RepositoryError> {
        let sql = format!(
            "UPDATE shops SET avatar = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {SHOP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id)
            .bind(avatar.map(Json))
            .fetch_optional(self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Credit a shop's withdrawable balance.
    ///
    /// Used when an order reaches delivered status (order total minus the
    /// platform fee).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    pub async fn credit_balance(&self, id: ShopId, amount: Decimal) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shops SET available_balance = available_balance + $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List all shops, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Shop>, RepositoryError> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, ShopRow>(&sql).fetch_all(self.pool).await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete a shop by ID. Products and coupons cascade at the database
    /// level.
    ///
    /// # Returns
    ///
    /// Returns `true` if the shop was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ShopId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Row type for the login query (shop columns plus the password hash).
#[derive(Debug, sqlx::FromRow)]
struct ShopWithPasswordRow {
    #[sqlx(flatten)]
    shop: ShopRow,
    password_hash: String,
}
