//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (DB ping)
//!
//! # Auth
//! POST /api/auth/register              - Create an account
//! POST /api/auth/login                 - Login, returns bearer token
//! POST /api/auth/logout                - Revoke the presented token
//! POST /api/auth/password/forgot       - Request an OTP reset code
//! POST /api/auth/password/reset        - Verify code, set new password
//!
//! # Catalog
//! GET  /api/products                   - Active products (?category=)
//! GET  /api/products/{slug}            - Product detail
//!
//! # Cart (bearer token or X-Cart-Token header)
//! GET    /api/cart                     - Fetch-or-create the cart
//! POST   /api/cart/items               - Add a line
//! PUT    /api/cart/items/{id}          - Change a line quantity
//! DELETE /api/cart/items/{id}          - Remove a line
//! DELETE /api/cart                     - Clear the cart
//!
//! # Checkout & orders
//! POST /api/checkout                   - Place the order, charge payment
//! GET  /api/orders                     - Own orders (requires auth)
//! GET  /api/orders/{number}            - One order (owner, or ?email= for guests)
//! POST /api/orders/{number}/payment-confirmation - Upload receipt (multipart)
//!
//! # Account (requires auth)
//! GET/POST       /api/account/addresses
//! PUT/DELETE     /api/account/addresses/{id}
//! PUT            /api/account/profile
//! POST           /api/account/profile-picture    (multipart)
//!
//! # Contact & schedule
//! POST /api/contact                    - Submit a contact message
//! GET  /api/schedule                   - Weekly opening/pickup hours
//!
//! # Admin (requires admin role) - see `admin` module
//! /api/admin/orders, /api/admin/inventory, /api/admin/customers,
//! /api/admin/reports, /api/admin/contact-messages, /api/admin/products,
//! /api/admin/promotions, /api/admin/delivery-zones, /api/admin/audit-log
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod orders;
pub mod products;
pub mod schedule;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/password/forgot", post(auth::forgot_password))
        .route("/password/reset", post(auth::reset_password))
}

/// Create the public catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the customer order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{number}", get(orders::show))
        .route(
            "/{number}/payment-confirmation",
            post(orders::upload_payment_confirmation),
        )
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/addresses",
            get(account::list_addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        .route("/profile", put(account::update_profile))
        .route("/profile-picture", post(account::upload_profile_picture))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::checkout))
        .nest("/api/orders", order_routes())
        .nest("/api/account", account_routes())
        .route("/api/contact", post(contact::submit))
        .route("/api/schedule", get(schedule::index))
        .nest("/api/admin", admin::routes())
}
