//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mandarin_core::{OrderId, OrderStatus, ProductId, ShopId, UserId};

use super::ImageRef;

/// An order placed against a single shop.
///
/// Checkout splits the cart by shop, so one checkout can create several
/// orders. Items are a snapshot of the cart at purchase time, not foreign
/// keys into the live catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer who placed the order.
    pub user_id: UserId,
    /// Shop the order was placed against.
    pub shop_id: ShopId,
    /// Cart snapshot.
    pub items: Vec<OrderItem>,
    /// Total charged for this order.
    pub total_price: Decimal,
    /// Where to deliver.
    pub shipping_address: ShippingAddress,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When payment settled, if it has.
    pub paid_at: Option<DateTime<Utc>>,
    /// When the order was delivered, if it has been.
    pub delivered_at: Option<DateTime<Utc>>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether this order includes the given product.
    #[must_use]
    pub fn contains_product(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }
}

/// A single line of an order's cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Catalog product this line was taken from.
    pub product_id: ProductId,
    /// Product name at purchase time.
    pub name: String,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price at purchase time.
    pub price: Decimal,
    /// First product image at purchase time, for order history rendering.
    pub image: Option<ImageRef>,
}

/// Delivery address snapshot for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub country: String,
    pub city: String,
    pub zip_code: String,
    pub address1: String,
    pub address2: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_items(product_ids: &[i32]) -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            shop_id: ShopId::new(1),
            items: product_ids
                .iter()
                .map(|&id| OrderItem {
                    product_id: ProductId::new(id),
                    name: format!("product {id}"),
                    quantity: 1,
                    price: Decimal::ONE,
                    image: None,
                })
                .collect(),
            total_price: Decimal::ONE,
            shipping_address: ShippingAddress {
                country: "US".to_string(),
                city: "Portland".to_string(),
                zip_code: "97201".to_string(),
                address1: "100 Main St".to_string(),
                address2: None,
            },
            status: OrderStatus::Processing,
            paid_at: None,
            delivered_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_contains_product() {
        let order = order_with_items(&[3, 7]);

        assert!(order.contains_product(ProductId::new(3)));
        assert!(order.contains_product(ProductId::new(7)));
        assert!(!order.contains_product(ProductId::new(8)));
    }

    #[test]
    fn test_contains_product_empty_order() {
        assert!(!order_with_items(&[]).contains_product(ProductId::new(1)));
    }
}
