//! Customer-facing order route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalCustomer, RequireCustomer};
use crate::models::order::{Order, OrderWithItems};
use crate::services::uploads::{self, UploadKind};
use crate::state::AppState;

/// List the authenticated customer's orders, newest first.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(customer.id)
        .await?;
    Ok(Json(orders))
}

/// Query parameters for guest order lookup.
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub email: Option<String>,
}

/// Fetch one order by number.
///
/// The owner sees it when authenticated; guests must supply the contact
/// email used at checkout.
#[instrument(skip(state, customer))]
pub async fn show(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    Path(number): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.pool());
    let order = load_owned_order(&repo, &number, &customer, query.email.as_deref()).await?;
    let items = repo.items(order.id).await?;
    Ok(Json(OrderWithItems { order, items }))
}

/// Attach a payment confirmation upload (image or PDF) to an order.
#[instrument(skip(state, customer, multipart))]
pub async fn upload_payment_confirmation(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    Path(number): Path<String>,
    Query(query): Query<LookupQuery>,
    mut multipart: Multipart,
) -> Result<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.pool());
    let order = load_owned_order(&repo, &number, &customer, query.email.as_deref()).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("missing file field".to_string()))?;

    let content_type = field
        .content_type()
        .map(ToString::to_string)
        .ok_or_else(|| AppError::BadRequest("missing file content type".to_string()))?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

    let path = uploads::store(
        &state.config().upload_root,
        UploadKind::PaymentConfirmation,
        &content_type,
        &bytes,
    )
    .await?;

    repo.set_payment_confirmation(order.id, &path).await?;

    let order = repo
        .get_with_items(order.id)
        .await?
        .ok_or_else(|| AppError::NotFound("order".to_string()))?;
    Ok(Json(order))
}

/// Load an order and check the requester may see it.
async fn load_owned_order(
    repo: &OrderRepository<'_>,
    number: &str,
    customer: &OptionalCustomer,
    guest_email: Option<&str>,
) -> Result<Order> {
    let order = repo
        .get_by_number(number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {number}")))?;

    // Authenticated owner
    if let Some(current) = &customer.0 {
        if order.customer_id == Some(current.id) {
            return Ok(order);
        }
    }

    // Guest lookup by contact email
    if let Some(email) = guest_email {
        if order.contact_email.eq_ignore_ascii_case(email.trim()) {
            return Ok(order);
        }
    }

    // Don't reveal whether the order exists
    Err(AppError::NotFound(format!("order {number}")))
}
