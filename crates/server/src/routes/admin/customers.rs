//! Admin customer management (read-only).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use shortcakes_core::CustomerId;

use crate::db::{CustomerRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::customer::Customer;
use crate::models::order::Order;
use crate::state::AppState;

use super::PageQuery;

/// List customers, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Customer>>> {
    let customers = CustomerRepository::new(state.pool())
        .list(query.page.unwrap_or(1))
        .await?;
    Ok(Json(customers))
}

/// A customer with their order history.
#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub orders: Vec<Order>,
}

/// Show one customer with their orders.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CustomerId>,
) -> Result<Json<CustomerDetail>> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(id)
        .await?;

    Ok(Json(CustomerDetail { customer, orders }))
}
