//! Checkout route handler.
//!
//! Prices the cart against the current catalog, applies promotion and
//! delivery fee, creates the order, charges the simulated gateway, and
//! fires the confirmation email. The cart is cleared only when payment
//! goes through.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use shortcakes_core::{Email, Fulfillment, PaymentMethod, PaymentStatus};

use crate::db::orders::{CreateOrderData, CreateOrderItemData};
use crate::db::{CartRepository, DeliveryZoneRepository, OrderRepository, PromotionRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CartToken, OptionalCustomer};
use crate::models::order::{CheckoutInput, OrderWithItems};
use crate::services::orders::{generate_order_number, price_order};
use crate::state::AppState;

/// Place an order from the current cart.
#[instrument(skip(state, customer, token, input))]
pub async fn checkout(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    token: CartToken,
    Json(input): Json<CheckoutInput>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    // Validate contact details up front
    Email::parse(&input.contact_email)
        .map_err(|e| AppError::BadRequest(format!("invalid contact email: {e}")))?;
    if input.contact_name.trim().is_empty() {
        return Err(AppError::BadRequest("contact name is required".to_string()));
    }

    // Resolve the cart
    let carts = CartRepository::new(state.pool());
    let cart = match (&customer.0, token.0) {
        (Some(current), _) => carts.get_by_customer(current.id).await?,
        (None, Some(token)) => carts.get_by_token(token).await?,
        (None, None) => None,
    }
    .ok_or_else(|| AppError::BadRequest("cart is empty".to_string()))?;

    let items = carts.items(cart.id).await?;
    if items.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    // Delivery orders need an address inside an active zone
    let (delivery_address, delivery_zone, delivery_fee) = match input.fulfillment {
        Fulfillment::Pickup => (None, None, Decimal::ZERO),
        Fulfillment::Delivery => {
            let address = input
                .delivery_address
                .as_deref()
                .filter(|a| !a.trim().is_empty())
                .ok_or_else(|| {
                    AppError::BadRequest("delivery address is required".to_string())
                })?;
            let postal_code = input.postal_code.as_deref().ok_or_else(|| {
                AppError::BadRequest("postal code is required for delivery".to_string())
            })?;
            let zone = DeliveryZoneRepository::new(state.pool())
                .find_for_postal_code(postal_code)
                .await?
                .ok_or_else(|| {
                    AppError::BadRequest("address is outside our delivery area".to_string())
                })?;
            let fee = zone.fee;
            (Some(address.to_string()), Some(zone), fee)
        }
    };

    // Promotion code
    let promotion = match input.promo_code.as_deref() {
        Some(code) if !code.trim().is_empty() => {
            let promo = PromotionRepository::new(state.pool())
                .get_by_code(code.trim())
                .await?
                .filter(|p| p.is_valid_at(Utc::now()))
                .ok_or_else(|| {
                    AppError::BadRequest("promotion code is invalid or expired".to_string())
                })?;
            Some(promo)
        }
        _ => None,
    };

    let totals = price_order(&items, promotion.as_ref(), delivery_fee);

    // Persist the order before charging, so declined payments stay visible
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .create(&CreateOrderData {
            order_number: generate_order_number(Utc::now()),
            customer_id: customer.0.as_ref().map(|c| c.id),
            contact_name: input.contact_name.trim().to_string(),
            contact_email: input.contact_email.trim().to_lowercase(),
            contact_phone: input.contact_phone.clone(),
            fulfillment: input.fulfillment,
            delivery_address,
            delivery_zone_id: delivery_zone.map(|z| z.id),
            scheduled_for: input.scheduled_for,
            payment_method: input.payment_method,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            discount: totals.discount,
            total: totals.total,
            note: input.note.clone(),
            items: items
                .iter()
                .map(|i| CreateOrderItemData {
                    product_id: i.product_id,
                    product_name: i.product_name.clone(),
                    unit_price: i.unit_price,
                    quantity: i.quantity,
                    customization: i.customization.clone(),
                })
                .collect(),
        })
        .await?;

    // Charge the simulated gateway
    match state
        .payments()
        .charge(input.payment_method, totals.total, input.card.as_ref())
        .await
    {
        Ok(receipt) => {
            let paid = match input.payment_method {
                PaymentMethod::Card => PaymentStatus::Paid,
                // Cash settles at pickup/delivery
                PaymentMethod::Cash => PaymentStatus::Pending,
            };
            orders
                .set_payment_result(order.order.id, paid, receipt.transaction_id.as_deref())
                .await?;
        }
        Err(e) => {
            orders
                .set_payment_result(order.order.id, PaymentStatus::Failed, None)
                .await?;
            tracing::warn!(order = %order.order.order_number, "Checkout payment failed: {e}");
            return Err(e.into());
        }
    }

    // Payment went through: clear the cart and notify
    carts.clear(cart.id).await?;

    let order = orders
        .get_with_items(order.order.id)
        .await?
        .ok_or_else(|| AppError::Internal("order vanished after creation".to_string()))?;

    if let Some(email) = state.email() {
        let email = email.clone();
        let to = order.order.contact_email.clone();
        let order_copy = order.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_order_confirmation(&to, &order_copy).await {
                tracing::error!("Failed to send order confirmation: {e}");
            }
        });
    }

    tracing::info!(
        order = %order.order.order_number,
        total = %order.order.total,
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(order)))
}
