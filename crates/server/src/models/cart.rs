//! Cart domain models.
//!
//! Carts belong to a customer or, for guests, to an opaque cart token sent
//! in the `X-Cart-Token` header.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shortcakes_core::{CartId, CartItemId, CustomerId, ProductId};

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning customer, if logged in.
    pub customer_id: Option<CustomerId>,
    /// Guest token; also set for customer carts so a login can adopt one.
    pub token: Uuid,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last touched.
    pub updated_at: DateTime<Utc>,
}

/// One line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Cart the line belongs to.
    pub cart_id: CartId,
    /// Product in the line.
    pub product_id: ProductId,
    /// Product name (joined in for display).
    pub product_name: String,
    /// Current unit price of the product.
    pub unit_price: Decimal,
    /// Quantity ordered.
    pub quantity: i32,
    /// Free-form customization ("Happy Birthday Ana", allergies, ...).
    pub customization: Option<String>,
}

/// A cart with its lines and computed totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartWithItems {
    /// The cart itself.
    #[serde(flatten)]
    pub cart: Cart,
    /// Cart lines.
    pub items: Vec<CartItem>,
    /// Sum of `unit_price × quantity` over the lines.
    pub subtotal: Decimal,
    /// Total number of units in the cart.
    pub item_count: i64,
}

impl CartWithItems {
    /// Assemble totals from a cart and its lines.
    #[must_use]
    pub fn new(cart: Cart, items: Vec<CartItem>) -> Self {
        let subtotal = items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum();
        let item_count = items.iter().map(|i| i64::from(i.quantity)).sum();
        Self {
            cart,
            items,
            subtotal,
            item_count,
        }
    }
}

/// Input for adding a line to the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItemInput {
    pub product_id: ProductId,
    pub quantity: i32,
    pub customization: Option<String>,
}

/// Input for changing a line's quantity. Zero removes the line.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartItemInput {
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn cart() -> Cart {
        Cart {
            id: CartId::new(1),
            customer_id: None,
            token: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(id: i32, price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            cart_id: CartId::new(1),
            product_id: ProductId::new(id),
            product_name: format!("product-{id}"),
            unit_price: price.parse().expect("price"),
            quantity,
            customization: None,
        }
    }

    #[test]
    fn test_totals_empty_cart() {
        let view = CartWithItems::new(cart(), vec![]);
        assert_eq!(view.subtotal, dec("0"));
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_totals_sum_lines() {
        let view = CartWithItems::new(cart(), vec![item(1, "24.50", 2), item(2, "3.25", 4)]);
        assert_eq!(view.subtotal, dec("62.00"));
        assert_eq!(view.item_count, 6);
    }
}
