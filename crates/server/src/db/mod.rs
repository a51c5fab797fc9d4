//! Database operations for the Short Cakes `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `customer`, `address` - accounts and address books
//! - `auth_token`, `password_reset` - bearer tokens and OTP reset codes
//! - `product`, `recipe_line` - catalog and per-product recipes
//! - `inventory_item`, `inventory_movement` - ingredients and their
//!   append-only movement log
//! - `cart`, `cart_item` - server-side carts (guest carts via token)
//! - `orders`, `order_item` - orders with denormalized line snapshots
//! - `contact_message`, `promotion`, `delivery_zone`, `audit_log`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p shortcakes-cli -- migrate
//! ```
//!
//! Queries use the runtime `query_as` API with internal `FromRow` row types
//! that convert into the domain models in [`crate::models`].

pub mod addresses;
pub mod audit;
pub mod auth;
pub mod carts;
pub mod contact;
pub mod customers;
pub mod delivery_zones;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod promotions;
pub mod schedules;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use audit::AuditRepository;
pub use auth::AuthRepository;
pub use carts::CartRepository;
pub use contact::ContactRepository;
pub use customers::CustomerRepository;
pub use delivery_zones::DeliveryZoneRepository;
pub use inventory::InventoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use promotions::PromotionRepository;
pub use schedules::ScheduleRepository;

/// Rows per page for paginated admin listings.
pub const PAGE_SIZE: i64 = 50;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Offset for a 1-based page number.
#[must_use]
pub const fn page_offset(page: i64) -> i64 {
    let page = if page < 1 { 1 } else { page };
    (page - 1) * PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), PAGE_SIZE);
        // Out-of-range pages clamp to the first page
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(-3), 0);
    }
}
