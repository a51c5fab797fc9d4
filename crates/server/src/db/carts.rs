//! Cart repository.
//!
//! Carts are keyed by owning customer or, for guests, by an opaque uuid
//! token. Lines are merged when the same product is added with the same
//! customization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shortcakes_core::{CartId, CartItemId, CustomerId, ProductId};

use super::RepositoryError;
use crate::models::cart::{AddCartItemInput, Cart, CartItem};

/// Internal row type for cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    customer_id: Option<i32>,
    token: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            customer_id: row.customer_id.map(CustomerId::new),
            token: row.token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for cart line queries (joined with the catalog).
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    cart_id: i32,
    product_id: i32,
    product_name: String,
    unit_price: Decimal,
    quantity: i32,
    customization: Option<String>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            customization: row.customization,
        }
    }
}

const CART_COLUMNS: &str = "id, customer_id, token, created_at, updated_at";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM cart WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a guest cart by token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, token: Uuid) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM cart WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a cart, owned by a customer or anonymous.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, customer_id: Option<CustomerId>) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "INSERT INTO cart (customer_id, token) VALUES ($1, $2) RETURNING {CART_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(Uuid::new_v4())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List the lines of a cart with current catalog names and prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            "SELECT c.id, c.cart_id, c.product_id, p.name AS product_name,
                    p.price AS unit_price, c.quantity, c.customization
             FROM cart_item c
             JOIN product p ON p.id = c.product_id
             WHERE c.cart_id = $1
             ORDER BY c.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a line to the cart, merging with an existing line for the same
    /// product and customization.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        input: &AddCartItemInput,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let merged: Option<i32> = sqlx::query_scalar(
            "UPDATE cart_item SET quantity = quantity + $3
             WHERE cart_id = $1 AND product_id = $2
               AND customization IS NOT DISTINCT FROM $4
             RETURNING id",
        )
        .bind(cart_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.customization.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        if merged.is_none() {
            sqlx::query(
                "INSERT INTO cart_item (cart_id, product_id, quantity, customization)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(cart_id)
            .bind(input.product_id)
            .bind(input.quantity)
            .bind(input.customization.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE cart SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Set a line's quantity. Zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist in this cart.
    pub async fn update_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = if quantity <= 0 {
            sqlx::query("DELETE FROM cart_item WHERE id = $1 AND cart_id = $2")
                .bind(item_id)
                .bind(cart_id)
                .execute(self.pool)
                .await?
        } else {
            sqlx::query("UPDATE cart_item SET quantity = $3 WHERE id = $1 AND cart_id = $2")
                .bind(item_id)
                .bind(cart_id)
                .bind(quantity)
                .execute(self.pool)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist in this cart.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE id = $1 AND cart_id = $2")
            .bind(item_id)
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove all lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
