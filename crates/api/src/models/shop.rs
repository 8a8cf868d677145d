//! Shop (seller account) domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mandarin_core::{Email, ShopId};

use super::ImageRef;

/// A seller's shop (domain type).
///
/// Shops follow the same unactivated -> activated lifecycle as users and
/// authenticate with their own session principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// Unique shop ID.
    pub id: ShopId,
    /// Shop display name.
    pub name: String,
    /// Shop's email address.
    pub email: Email,
    /// Contact phone number.
    pub phone: String,
    /// Physical address line.
    pub address: String,
    /// Postal code.
    pub zip_code: String,
    /// Optional shop description.
    pub description: Option<String>,
    /// Shop avatar stored at the image host, if any.
    pub avatar: Option<ImageRef>,
    /// Balance credited from delivered orders, minus the service charge.
    pub available_balance: Decimal,
    /// When the shop was created.
    pub created_at: DateTime<Utc>,
    /// When the shop was last updated.
    pub updated_at: DateTime<Utc>,
}
