//! User repository for database operations.
//!
//! Provides database access for customer accounts and their address books.
//! Queries are runtime-checked `query_as` calls decoding into `FromRow` row
//! types, converted to domain types via `TryFrom`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use mandarin_core::{AddressId, AddressKind, Email, UserId, UserRole};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::{Address, User};
use crate::models::ImageRef;

const USER_COLUMNS: &str = "id, name, email, phone, avatar, role, created_at, updated_at";
const ADDRESS_COLUMNS: &str =
    "id, user_id, kind, country, city, zip_code, address1, address2, position";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    avatar: Option<Json<ImageRef>>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: UserRole = row
            .role
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            avatar: row.avatar.map(|Json(img)| img),
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for `PostgreSQL` address queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    user_id: i32,
    kind: String,
    country: String,
    city: String,
    zip_code: String,
    address1: String,
    address2: Option<String>,
    position: i32,
}

impl TryFrom<AddressRow> for Address {
    type Error = RepositoryError;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        let kind: AddressKind = row.kind.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid address kind in database: {e}"))
        })?;

        Ok(Self {
            id: AddressId::new(row.id),
            user_id: UserId::new(row.user_id),
            kind,
            country: row.country,
            city: row.city,
            zip_code: row.zip_code,
            address1: row.address1,
            address2: row.address2,
            position: row.position,
        })
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Fields for creating a user (the materialized activation payload).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub phone: Option<String>,
    pub avatar: Option<ImageRef>,
}

/// Fields for an address upsert.
///
/// With `id` set and matching an existing row, the row is updated in place;
/// otherwise a new address is appended to the end of the list.
#[derive(Debug, Clone)]
pub struct AddressUpsert {
    pub id: Option<AddressId>,
    pub kind: AddressKind,
    pub country: String,
    pub city: String,
    pub zip_code: String,
    pub address1: String,
    pub address2: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, phone, avatar)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.phone)
            .bind(new_user.avatar.as_ref().map(Json))
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "email already exists"))?;

        row.try_into()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserWithPasswordRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let password_hash = row.password_hash.clone();
        let user: User = row.user.try_into()?;
        Ok(Some((user, password_hash)))
    }

    /// Get a user's password hash by ID.
    ///
    /// Used for re-entry confirmation on profile and password updates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn get_password_hash(&self, id: UserId) -> Result<String, RepositoryError> {
        let hash: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        hash.map(|(h,)| h).ok_or(RepositoryError::NotFound)
    }

    /// Update a user's profile fields (name, email, phone).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_info(
        &self,
        id: UserId,
        name: &str,
        email: &Email,
        phone: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "UPDATE users SET name = $2, email = $3, phone = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(phone)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "email already exists"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Replace a user's avatar reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_avatar(
        &self,
        id: UserId,
        avatar: Option<&ImageRef>,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "UPDATE users SET avatar = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(avatar.map(Json))
            .fetch_optional(self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_password(&self, id: UserId, password_hash: &str) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, UserRow>(&sql).fetch_all(self.pool).await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete a user by ID. Addresses cascade at the database level.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// List a user's addresses in list order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_addresses(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY position ASC"
        );
        let rows = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Upsert an address into a user's list.
    ///
    /// Updates in place (position preserved) when `input.id` names an
    /// existing address of this user; otherwise appends to the end of the
    /// list. The unique index on `(user_id, kind)` rejects a second address
    /// of the same kind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the kind is already in use.
    pub async fn upsert_address(
        &self,
        user_id: UserId,
        input: &AddressUpsert,
    ) -> Result<Address, RepositoryError> {
        if let Some(id) = input.id {
            let sql = format!(
                "UPDATE addresses
                 SET kind = $3, country = $4, city = $5, zip_code = $6, address1 = $7, address2 = $8
                 WHERE id = $1 AND user_id = $2
                 RETURNING {ADDRESS_COLUMNS}"
            );
            let row = sqlx::query_as::<_, AddressRow>(&sql)
                .bind(id)
                .bind(user_id)
                .bind(input.kind.to_string())
                .bind(&input.country)
                .bind(&input.city)
                .bind(&input.zip_code)
                .bind(&input.address1)
                .bind(&input.address2)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| map_unique_violation(e, "address kind already exists"))?;

            if let Some(row) = row {
                return row.try_into();
            }
            // Unknown id: fall through and append as a new address.
        }

        let sql = format!(
            "INSERT INTO addresses (user_id, kind, country, city, zip_code, address1, address2, position)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     (SELECT COALESCE(MAX(position) + 1, 0) FROM addresses WHERE user_id = $1))
             RETURNING {ADDRESS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(user_id)
            .bind(input.kind.to_string())
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.zip_code)
            .bind(&input.address1)
            .bind(&input.address2)
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "address kind already exists"))?;

        row.try_into()
    }

    /// Delete an address by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the address was deleted, `false` if it didn't exist.
    /// Callers treat both as success (the delete endpoint is idempotent).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Row type for the login query (user columns plus the password hash).
#[derive(Debug, sqlx::FromRow)]
struct UserWithPasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}
