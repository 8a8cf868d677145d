//! Session-related types.
//!
//! Types stored in the session for authentication state. Customers and
//! sellers authenticate independently and can be logged in at the same time.

use serde::{Deserialize, Serialize};

use mandarin_core::{Email, ShopId, UserId, UserRole};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's role (the admin gate checks this without a database read).
    pub role: UserRole,
}

/// Session-stored seller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSeller {
    /// Shop's database ID.
    pub id: ShopId,
    /// Shop's email address.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the current logged-in seller.
    pub const CURRENT_SELLER: &str = "current_seller";
}
