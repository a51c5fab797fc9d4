//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shortcakes_core::{
    CustomerId, DeliveryZoneId, Fulfillment, OrderId, OrderItemId, OrderStatus, PaymentMethod,
    PaymentStatus, ProductId,
};

/// An order.
///
/// Contact details are stored inline so guest orders work without an
/// account; item names and prices are denormalized at checkout time so later
/// catalog edits don't rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-readable order number (e.g. `SSC-20250807-A1B2`).
    pub order_number: String,
    /// Owning customer, if the order was placed logged in.
    pub customer_id: Option<CustomerId>,
    /// Contact name.
    pub contact_name: String,
    /// Contact email; used for guest lookup and notifications.
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Pickup or delivery.
    pub fulfillment: Fulfillment,
    /// Delivery address, one line, for delivery orders.
    pub delivery_address: Option<String>,
    /// Matched delivery zone, for delivery orders.
    pub delivery_zone_id: Option<DeliveryZoneId>,
    /// Requested pickup/delivery time.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Order lifecycle status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Gateway transaction ID, when paid by card.
    pub payment_transaction_id: Option<String>,
    /// Path of an uploaded payment confirmation, if any.
    pub payment_confirmation: Option<String>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Delivery fee from the matched zone.
    pub delivery_fee: Decimal,
    /// Promotion discount applied to the subtotal.
    pub discount: Decimal,
    /// `subtotal - discount + delivery_fee`.
    pub total: Decimal,
    /// Customer note.
    pub note: Option<String>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// Order the line belongs to.
    pub order_id: OrderId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Product name at checkout time.
    pub product_name: String,
    /// Unit price at checkout time.
    pub unit_price: Decimal,
    /// Quantity ordered.
    pub quantity: i32,
    /// Free-form customization.
    pub customization: Option<String>,
}

/// An order with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    /// The order itself.
    #[serde(flatten)]
    pub order: Order,
    /// Order lines.
    pub items: Vec<OrderItem>,
}

/// Checkout request.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutInput {
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub fulfillment: Fulfillment,
    /// Required for delivery orders.
    pub delivery_address: Option<String>,
    /// Required for delivery orders; used for zone matching.
    pub postal_code: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub promo_code: Option<String>,
    pub payment_method: PaymentMethod,
    /// Card details for the simulated gateway; required for card payments.
    pub card: Option<CardDetails>,
    pub note: Option<String>,
}

/// Card details passed to the simulated payment gateway.
///
/// Only the last four digits are ever persisted or logged.
#[derive(Clone, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvc: String,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last4 = self
            .number
            .chars()
            .rev()
            .take(4)
            .collect::<String>()
            .chars()
            .rev()
            .collect::<String>();
        f.debug_struct("CardDetails")
            .field("number", &format!("****{last4}"))
            .field("expiry", &self.expiry)
            .field("cvc", &"***")
            .finish()
    }
}

/// Admin status transition request.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionInput {
    pub status: OrderStatus,
}

/// Filter for admin order listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub page: Option<i64>,
}

/// Aggregated sales report for a date range.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    /// Start of the reporting window (inclusive).
    pub from: DateTime<Utc>,
    /// End of the reporting window (exclusive).
    pub to: DateTime<Utc>,
    /// Orders placed in the window, cancelled excluded.
    pub order_count: i64,
    /// Revenue over paid orders in the window.
    pub revenue: Decimal,
    /// Average order value over paid orders.
    pub average_order_value: Decimal,
    /// Order counts per status.
    pub by_status: Vec<StatusCount>,
    /// Best-selling products by units.
    pub top_products: Vec<ProductSales>,
}

/// Order count for one status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Units and revenue for one product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    pub units: i64,
    pub revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_details_debug_redacts() {
        let card = CardDetails {
            number: "4242424242424242".to_string(),
            expiry: "12/27".to_string(),
            cvc: "123".to_string(),
        };
        let debug = format!("{card:?}");
        assert!(debug.contains("****4242"));
        assert!(!debug.contains("4242424242424242"));
        assert!(!debug.contains("123"));
    }
}
