//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! All routes live under `/api/v1`. Responses are JSON envelopes with a
//! `success` boolean plus a payload or `message`.
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # User (/api/v1/user)
//! POST   /create-user                   - Register, mail activation link
//! POST   /activation                    - Activate account, start session
//! POST   /login-user                    - Login
//! GET    /logout                        - Logout
//! GET    /get-user                      - Current user (auth)
//! GET    /user-info/{id}                - Public profile
//! PUT    /update-user-info              - Change name/email/phone (auth)
//! PUT    /update-avatar                 - Replace avatar (auth)
//! PUT    /update-user-addresses         - Upsert an address (auth)
//! DELETE /delete-user-address/{id}      - Remove an address (auth)
//! PUT    /update-user-password          - Change password (auth)
//! GET    /admin-all-users               - All users (admin)
//! DELETE /delete-user/{id}              - Delete a user (admin)
//!
//! # Shop (/api/v1/shop)
//! POST   /create-shop                   - Register, mail activation link
//! POST   /activation                    - Activate shop, start seller session
//! POST   /login-shop                    - Seller login
//! GET    /logout                        - Seller logout
//! GET    /get-shop                      - Current shop (seller auth)
//! GET    /get-shop-info/{id}            - Public shop profile
//! PUT    /update-shop-avatar            - Replace avatar (seller auth)
//! PUT    /update-seller-info            - Change profile (seller auth)
//! GET    /admin-all-sellers             - All shops (admin)
//! DELETE /delete-seller/{id}            - Delete a shop (admin)
//!
//! # Product (/api/v1/product)
//! POST   /create-product                - Create product (seller auth)
//! GET    /get-all-products-shop/{id}    - A shop's products
//! DELETE /delete-shop-product/{id}      - Delete own product (seller auth)
//! GET    /get-all-products              - Paginated catalog
//! PUT    /create-new-review             - Upsert a review (auth)
//! GET    /admin-all-products            - All products (admin)
//!
//! # Order (/api/v1/order)
//! POST   /create-order                  - Checkout, one order per shop (auth)
//! GET    /get-all-orders/{user_id}      - A user's orders
//! GET    /get-seller-all-orders/{id}    - A shop's orders
//! PUT    /update-order-status/{id}      - Advance status (seller auth)
//! PUT    /order-refund/{id}             - Request refund (auth)
//! PUT    /order-refund-success/{id}     - Approve refund (seller auth)
//! GET    /admin-all-orders              - All orders (admin)
//!
//! # Coupon (/api/v1/coupon)
//! POST   /create-coupon-code            - Create coupon (seller auth)
//! GET    /get-coupon/{shop_id}          - A shop's coupons (seller auth)
//! GET    /get-coupon-value/{name}       - Lookup for checkout
//! DELETE /delete-coupon/{id}            - Delete coupon (seller auth)
//! ```

pub mod coupon;
pub mod health;
pub mod order;
pub mod product;
pub mod shop;
pub mod user;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create-user", post(user::create_user))
        .route("/activation", post(user::activation))
        .route("/login-user", post(user::login_user))
        .route("/logout", get(user::logout))
        .route("/get-user", get(user::get_user))
        .route("/user-info/{id}", get(user::user_info))
        .route("/update-user-info", put(user::update_user_info))
        .route("/update-avatar", put(user::update_avatar))
        .route("/update-user-addresses", put(user::update_user_addresses))
        .route(
            "/delete-user-address/{id}",
            delete(user::delete_user_address),
        )
        .route("/update-user-password", put(user::update_user_password))
        .route("/admin-all-users", get(user::admin_all_users))
        .route("/delete-user/{id}", delete(user::delete_user))
}

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/create-shop", post(shop::create_shop))
        .route("/activation", post(shop::activation))
        .route("/login-shop", post(shop::login_shop))
        .route("/logout", get(shop::logout))
        .route("/get-shop", get(shop::get_shop))
        .route("/get-shop-info/{id}", get(shop::get_shop_info))
        .route("/update-shop-avatar", put(shop::update_shop_avatar))
        .route("/update-seller-info", put(shop::update_seller_info))
        .route("/admin-all-sellers", get(shop::admin_all_sellers))
        .route("/delete-seller/{id}", delete(shop::delete_seller))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/create-product", post(product::create_product))
        .route(
            "/get-all-products-shop/{shop_id}",
            get(product::get_all_products_shop),
        )
        .route(
            "/delete-shop-product/{id}",
            delete(product::delete_shop_product),
        )
        .route("/get-all-products", get(product::get_all_products))
        .route("/create-new-review", put(product::create_new_review))
        .route("/admin-all-products", get(product::admin_all_products))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(order::create_order))
        .route("/get-all-orders/{user_id}", get(order::get_all_orders))
        .route(
            "/get-seller-all-orders/{shop_id}",
            get(order::get_seller_all_orders),
        )
        .route("/update-order-status/{id}", put(order::update_order_status))
        .route("/order-refund/{id}", put(order::order_refund))
        .route(
            "/order-refund-success/{id}",
            put(order::order_refund_success),
        )
        .route("/admin-all-orders", get(order::admin_all_orders))
}

/// Create the coupon routes router.
pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/create-coupon-code", post(coupon::create_coupon_code))
        .route("/get-coupon/{shop_id}", get(coupon::get_coupon))
        .route("/get-coupon-value/{name}", get(coupon::get_coupon_value))
        .route("/delete-coupon/{id}", delete(coupon::delete_coupon))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/user", user_routes())
        .nest("/shop", shop_routes())
        .nest("/product", product_routes())
        .nest("/order", order_routes())
        .nest("/coupon", coupon_routes());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api)
}
