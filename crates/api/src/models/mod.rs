//! Domain models for the marketplace.
//!
//! These types represent validated domain objects, separate from the
//! `FromRow` row types the repositories decode. Everything here serializes
//! straight into API response payloads.

pub mod coupon;
pub mod order;
pub mod product;
pub mod session;
pub mod shop;
pub mod user;

use serde::{Deserialize, Serialize};

/// A reference to an object stored at the image host.
///
/// The `public_id` is what the host's delete endpoint takes; the `url` is
/// what clients render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image host object identifier.
    pub public_id: String,
    /// Public CDN URL of the image.
    pub url: String,
}
