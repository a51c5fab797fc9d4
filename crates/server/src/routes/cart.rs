//! Cart route handlers.
//!
//! Logged-in customers get a cart bound to their account; guests get one
//! bound to the `X-Cart-Token` header. The token is included in every cart
//! response so guests can persist it client-side.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use shortcakes_core::CartItemId;

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CartToken, OptionalCustomer};
use crate::models::cart::{AddCartItemInput, Cart, CartWithItems, UpdateCartItemInput};
use crate::state::AppState;

/// Resolve the request's cart: the customer's cart when authenticated,
/// otherwise the guest cart named by the token header.
async fn find_cart(
    state: &AppState,
    customer: &OptionalCustomer,
    token: &CartToken,
) -> Result<Option<Cart>> {
    let carts = CartRepository::new(state.pool());

    if let Some(customer) = &customer.0 {
        if let Some(cart) = carts.get_by_customer(customer.id).await? {
            return Ok(Some(cart));
        }
    }
    if let Some(token) = token.0 {
        return Ok(carts.get_by_token(token).await?);
    }
    Ok(None)
}

/// Resolve the request's cart, creating one if none exists yet.
async fn find_or_create_cart(
    state: &AppState,
    customer: &OptionalCustomer,
    token: &CartToken,
) -> Result<Cart> {
    if let Some(cart) = find_cart(state, customer, token).await? {
        return Ok(cart);
    }
    let carts = CartRepository::new(state.pool());
    let cart = carts.create(customer.0.as_ref().map(|c| c.id)).await?;
    Ok(cart)
}

/// Load a cart with its lines and totals.
async fn load_view(state: &AppState, cart: Cart) -> Result<CartWithItems> {
    let items = CartRepository::new(state.pool()).items(cart.id).await?;
    Ok(CartWithItems::new(cart, items))
}

/// Fetch (or create) the current cart.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    token: CartToken,
) -> Result<Json<CartWithItems>> {
    let cart = find_or_create_cart(&state, &customer, &token).await?;
    Ok(Json(load_view(&state, cart).await?))
}

/// Add a line to the cart.
#[instrument(skip(state, customer, token))]
pub async fn add_item(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    token: CartToken,
    Json(input): Json<AddCartItemInput>,
) -> Result<Json<CartWithItems>> {
    if input.quantity <= 0 {
        return Err(AppError::BadRequest("quantity must be positive".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .get_by_id(input.product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound("product".to_string()))?;

    let cart = find_or_create_cart(&state, &customer, &token).await?;
    CartRepository::new(state.pool())
        .add_item(cart.id, &input)
        .await?;

    tracing::debug!(product = %product.name, quantity = input.quantity, "Added to cart");
    Ok(Json(load_view(&state, cart).await?))
}

/// Change a line's quantity. Zero removes the line.
#[instrument(skip(state, customer, token))]
pub async fn update_item(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    token: CartToken,
    Path(item_id): Path<CartItemId>,
    Json(input): Json<UpdateCartItemInput>,
) -> Result<Json<CartWithItems>> {
    let cart = find_cart(&state, &customer, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("cart".to_string()))?;

    CartRepository::new(state.pool())
        .update_item(cart.id, item_id, input.quantity)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("cart item".to_string()),
            other => other.into(),
        })?;

    Ok(Json(load_view(&state, cart).await?))
}

/// Remove a line from the cart.
#[instrument(skip(state, customer, token))]
pub async fn remove_item(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    token: CartToken,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<CartWithItems>> {
    let cart = find_cart(&state, &customer, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("cart".to_string()))?;

    CartRepository::new(state.pool())
        .remove_item(cart.id, item_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("cart item".to_string()),
            other => other.into(),
        })?;

    Ok(Json(load_view(&state, cart).await?))
}

/// Clear the cart.
#[instrument(skip_all)]
pub async fn clear(
    State(state): State<AppState>,
    customer: OptionalCustomer,
    token: CartToken,
) -> Result<Json<CartWithItems>> {
    let cart = find_cart(&state, &customer, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("cart".to_string()))?;

    CartRepository::new(state.pool()).clear(cart.id).await?;
    Ok(Json(load_view(&state, cart).await?))
}
