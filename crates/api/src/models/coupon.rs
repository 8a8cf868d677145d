//! Coupon domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mandarin_core::{CouponId, ShopId};

/// A discount coupon issued by a shop.
///
/// Coupon names are globally unique so checkout can resolve a code without
/// knowing the shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique coupon ID.
    pub id: CouponId,
    /// Issuing shop.
    pub shop_id: ShopId,
    /// The coupon code customers type in.
    pub name: String,
    /// Discount percentage (0-100).
    pub value: Decimal,
    /// Minimum cart amount for the coupon to apply.
    pub min_amount: Option<Decimal>,
    /// Cap on the discounted amount.
    pub max_amount: Option<Decimal>,
    /// Restrict the coupon to one product name, if set.
    pub selected_product: Option<String>,
    /// When the coupon was created.
    pub created_at: DateTime<Utc>,
}
