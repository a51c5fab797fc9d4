//! Admin order management.
//!
//! The `pending → confirmed` transition deducts recipe ingredients inside
//! one guarded transaction (see `services::orders::confirm_order`) and fires
//! low-stock alerts afterwards. The `ready` transition notifies pickup
//! customers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;

use shortcakes_core::{Fulfillment, OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::order::{Order, OrderFilter, OrderWithItems, TransitionInput};
use crate::services::orders::{ConfirmOutcome, LowStockItem, confirm_order};
use crate::state::AppState;

/// List orders, newest first, optionally filtered by status.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(orders))
}

/// Show one order with its lines.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    let order = OrderRepository::new(state.pool())
        .get_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(order))
}

/// Transition an order's status.
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn transition(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(input): Json<TransitionInput>,
) -> Result<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.status.can_transition_to(input.status) {
        return Err(AppError::Conflict(format!(
            "cannot transition order from {} to {}",
            order.status, input.status
        )));
    }

    match input.status {
        OrderStatus::Confirmed => {
            match confirm_order(state.pool(), id).await? {
                ConfirmOutcome::Confirmed { low_stock } => {
                    spawn_low_stock_alerts(&state, low_stock);
                }
                ConfirmOutcome::NotPending => {
                    return Err(AppError::Conflict(
                        "order is no longer pending".to_string(),
                    ));
                }
            }
        }
        to => {
            let moved = repo.transition(id, order.status, to).await?;
            if !moved {
                return Err(AppError::Conflict(
                    "order status changed concurrently".to_string(),
                ));
            }
            if to == OrderStatus::Ready && order.fulfillment == Fulfillment::Pickup {
                spawn_pickup_ready_email(&state, &order);
            }
        }
    }

    super::audit(
        &state,
        admin.id,
        "order.transition",
        "order",
        Some(id.as_i32()),
        json!({ "from": order.status, "to": input.status }),
    )
    .await;

    let order = repo
        .get_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(order))
}

/// Fire low-stock alert emails without blocking the response.
fn spawn_low_stock_alerts(state: &AppState, items: Vec<LowStockItem>) {
    let Some(email) = state.email() else {
        if !items.is_empty() {
            tracing::warn!(count = items.len(), "Low stock after deduction, SMTP disabled");
        }
        return;
    };
    let Some(alert_to) = state.config().alert_email.clone() else {
        if !items.is_empty() {
            tracing::warn!(count = items.len(), "Low stock after deduction, no alert address");
        }
        return;
    };

    for item in items {
        let email = email.clone();
        let to = alert_to.clone();
        tokio::spawn(async move {
            if let Err(e) = email
                .send_low_stock_alert(&to, &item.name, &item.quantity, &item.unit, &item.threshold)
                .await
            {
                tracing::error!(item = %item.name, "Failed to send low stock alert: {e}");
            }
        });
    }
}

/// Notify a pickup customer their order is ready, without blocking.
fn spawn_pickup_ready_email(state: &AppState, order: &Order) {
    let Some(email) = state.email() else {
        return;
    };
    let email = email.clone();
    let to = order.contact_email.clone();
    let name = order.contact_name.clone();
    let number = order.order_number.clone();
    tokio::spawn(async move {
        if let Err(e) = email.send_pickup_ready(&to, &name, &number).await {
            tracing::error!(order = %number, "Failed to send pickup-ready email: {e}");
        }
    });
}
