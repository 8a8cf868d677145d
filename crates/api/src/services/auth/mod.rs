//! Authentication service.
//!
//! Covers both customer and seller accounts: registration produces a signed
//! activation token (no database write), activation materializes the
//! account, and login verifies an Argon2id hash.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use mandarin_core::{Email, ShopId, UserId};

use crate::db::RepositoryError;
use crate::db::shops::{NewShop, ShopRepository};
use crate::db::users::{NewUser, UserRepository};
use crate::models::ImageRef;
use crate::models::shop::Shop;
use crate::models::user::User;
use crate::services::activation::{ActivationSigner, PendingShop, PendingUser};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Fields submitted when a customer registers.
#[derive(Debug)]
pub struct UserRegistration<'r> {
    pub name: &'r str,
    pub email: &'r str,
    pub password: &'r str,
    pub phone: Option<&'r str>,
    pub avatar: Option<ImageRef>,
}

/// Fields submitted when a seller registers.
#[derive(Debug)]
pub struct ShopRegistration<'r> {
    pub name: &'r str,
    pub email: &'r str,
    pub password: &'r str,
    pub phone: &'r str,
    pub address: &'r str,
    pub zip_code: &'r str,
    pub avatar: Option<ImageRef>,
}

/// Authentication service.
///
/// Handles registration, activation, login, and password changes for both
/// account kinds.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    shops: ShopRepository<'a>,
    signer: &'a ActivationSigner,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, signer: &'a ActivationSigner) -> Self {
        Self {
            users: UserRepository::new(pool),
            shops: ShopRepository::new(pool),
            signer,
        }
    }

    // =========================================================================
    // Customer Accounts
    // =========================================================================

    /// Validate a customer registration and produce its activation token.
    ///
    /// Nothing is persisted here; the pending account travels inside the
    /// token until activation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AlreadyExists` if an activated account holds the email.
    pub async fn register_user(
        &self,
        registration: UserRegistration<'_>,
    ) -> Result<(Email, String), AuthError> {
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;

        if self.users.get_with_password(&email).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let pending = PendingUser {
            name: registration.name.to_string(),
            email: email.clone(),
            password_hash: hash_password(registration.password)?,
            phone: registration.phone.map(ToString::to_string),
            avatar: registration.avatar,
        };
        let token = self.signer.sign(pending)?;

        Ok((email, token))
    }

    /// Materialize a customer account from its activation token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is invalid or expired.
    /// Returns `AuthError::AlreadyExists` if the account was activated already.
    pub async fn activate_user(&self, token: &str) -> Result<User, AuthError> {
        let pending: PendingUser = self.signer.verify(token)?;

        let user = self
            .users
            .create(&NewUser {
                name: pending.name,
                email: pending.email,
                password_hash: pending.password_hash,
                phone: pending.phone,
                avatar: pending.avatar,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login a customer with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Verify a customer's current password.
    ///
    /// Used as the re-entry gate on profile updates.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WrongPassword` if the password is wrong.
    pub async fn verify_user_password(
        &self,
        user_id: UserId,
        password: &str,
    ) -> Result<(), AuthError> {
        let hash = self.users.get_password_hash(user_id).await?;
        match verify_password(password, &hash) {
            Err(AuthError::InvalidCredentials) => Err(AuthError::WrongPassword),
            other => other,
        }
    }

    /// Change a customer's password after verifying the old one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WrongPassword` if the old password is wrong.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::WeakPassword` if the new password is too weak.
    pub async fn change_user_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        self.verify_user_password(user_id, old_password).await?;

        if new_password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(new_password)?;

        let hash = hash_password(new_password)?;
        self.users.set_password(user_id, &hash).await?;

        Ok(())
    }

    // =========================================================================
    // Seller Accounts
    // =========================================================================

    /// Validate a seller registration and produce its activation token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AlreadyExists` if an activated shop holds the email.
    pub async fn register_shop(
        &self,
        registration: ShopRegistration<'_>,
    ) -> Result<(Email, String), AuthError> {
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;

        if self.shops.get_with_password(&email).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let pending = PendingShop {
            name: registration.name.to_string(),
            email: email.clone(),
            password_hash: hash_password(registration.password)?,
            phone: registration.phone.to_string(),
            address: registration.address.to_string(),
            zip_code: registration.zip_code.to_string(),
            avatar: registration.avatar,
        };
        let token = self.signer.sign(pending)?;

        Ok((email, token))
    }

    /// Materialize a seller account from its activation token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is invalid or expired.
    /// Returns `AuthError::AlreadyExists` if the shop was activated already.
    pub async fn activate_shop(&self, token: &str) -> Result<Shop, AuthError> {
        let pending: PendingShop = self.signer.verify(token)?;

        let shop = self
            .shops
            .create(&NewShop {
                name: pending.name,
                email: pending.email,
                password_hash: pending.password_hash,
                phone: pending.phone,
                address: pending.address,
                zip_code: pending.zip_code,
                avatar: pending.avatar,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(shop)
    }

    /// Login a seller with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_shop(&self, email: &str, password: &str) -> Result<Shop, AuthError> {
        let email = Email::parse(email)?;

        let (shop, password_hash) = self
            .shops
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(shop)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Get a seller by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if the shop doesn't exist.
    pub async fn get_shop(&self, shop_id: ShopId) -> Result<Shop, AuthError> {
        self.shops
            .get_by_id(shop_id)
            .await?
            .ok_or(AuthError::NotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{hash_password, validate_password, verify_password};

    #[test]
    fn test_validate_password_too_short() {
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(verify_password("wrong horse", &hash).is_err());
    }
}
