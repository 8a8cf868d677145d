//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mandarin_core::{ProductId, ShopId, UserId};

use super::ImageRef;

/// A catalog product (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Shop that sells this product.
    pub shop_id: ShopId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Option<String>,
    /// Pre-discount price, shown struck through when present.
    pub original_price: Option<Decimal>,
    /// The price actually charged.
    pub discount_price: Decimal,
    /// Units in stock. Decremented when an order ships.
    pub stock: i32,
    /// Product photos at the image host.
    pub images: Vec<ImageRef>,
    /// Average review rating, absent until the first review.
    pub ratings: Option<Decimal>,
    /// Customer reviews, one per user.
    pub reviews: Vec<Review>,
    /// Units sold across shipped orders.
    pub sold_out: i32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// A customer review embedded in a product.
///
/// Each user gets one review per product; re-reviewing replaces the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Reviewing user.
    pub user_id: UserId,
    /// Reviewer name snapshot at review time.
    pub user_name: String,
    /// Rating from 1 to 5.
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Recompute the average rating from the review list.
    ///
    /// Returns `None` when there are no reviews.
    #[must_use]
    pub fn average_rating(reviews: &[Review]) -> Option<Decimal> {
        if reviews.is_empty() {
            return None;
        }
        let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
        let count = i64::try_from(reviews.len()).unwrap_or(i64::MAX);
        Some(Decimal::new(sum, 0) / Decimal::new(count, 0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use mandarin_core::UserId;

    use super::{Product, Review};

    fn review(user: i32, rating: i16) -> Review {
        Review {
            user_id: UserId::new(user),
            user_name: format!("user-{user}"),
            rating,
            comment: "fine".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_average_rating_empty() {
        assert_eq!(Product::average_rating(&[]), None);
    }

    #[test]
    fn test_average_rating_mean() {
        let reviews = vec![review(1, 4), review(2, 5)];
        let avg = Product::average_rating(&reviews).unwrap();
        assert_eq!(avg, Decimal::new(45, 1)); // 4.5
    }
}
