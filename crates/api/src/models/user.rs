//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mandarin_core::{AddressId, AddressKind, Email, UserId, UserRole};

use super::ImageRef;

/// A customer account (domain type).
///
/// The password hash never leaves the repository layer, so this type is safe
/// to serialize into responses as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Avatar stored at the image host, if any.
    pub avatar: Option<ImageRef>,
    /// Role of the account.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A saved address in a user's address book.
///
/// A user holds at most one address of each [`AddressKind`]; `position`
/// preserves insertion order in the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Database ID of this address.
    pub id: AddressId,
    /// Owning user.
    pub user_id: UserId,
    /// Address type tag (unique per user).
    pub kind: AddressKind,
    pub country: String,
    pub city: String,
    pub zip_code: String,
    pub address1: String,
    pub address2: Option<String>,
    /// Position in the user's list; untouched rows keep theirs on upsert.
    pub position: i32,
}
