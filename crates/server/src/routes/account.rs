//! Account route handlers: address book, profile, profile picture.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;

use shortcakes_core::AddressId;

use crate::db::{AddressRepository, CustomerRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::models::customer::{
    Address, CreateAddressInput, Customer, UpdateAddressInput, UpdateProfileInput,
};
use crate::services::uploads::{self, UploadKind};
use crate::state::AppState;

/// List the customer's addresses.
#[instrument(skip_all)]
pub async fn list_addresses(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_customer(customer.id)
        .await?;
    Ok(Json(addresses))
}

/// Create an address.
#[instrument(skip(state, customer, input))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Json(input): Json<CreateAddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    let address = AddressRepository::new(state.pool())
        .create(customer.id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// Update an address.
#[instrument(skip(state, customer, input))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<AddressId>,
    Json(input): Json<UpdateAddressInput>,
) -> Result<Json<Address>> {
    let address = AddressRepository::new(state.pool())
        .update(customer.id, id, &input)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("address".to_string()),
            other => other.into(),
        })?;
    Ok(Json(address))
}

/// Delete an address.
#[instrument(skip(state, customer))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<AddressId>,
) -> Result<StatusCode> {
    AddressRepository::new(state.pool())
        .delete(customer.id, id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("address".to_string()),
            other => other.into(),
        })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update profile fields.
#[instrument(skip(state, customer, input))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<Customer>> {
    let customer = CustomerRepository::new(state.pool())
        .update_profile(customer.id, &input)
        .await?;
    Ok(Json(customer))
}

/// Upload a profile picture (images only).
#[instrument(skip_all)]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    mut multipart: Multipart,
) -> Result<Json<Customer>> {
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
        UploadKind::ProfilePicture,
        &content_type,
        &bytes,
    )
    .await?;

    let customers = CustomerRepository::new(state.pool());
    customers.set_profile_picture(customer.id, &path).await?;

    let customer = customers
        .get_by_id(customer.id)
        .await?
        .ok_or_else(|| AppError::NotFound("customer".to_string()))?;
    Ok(Json(customer))
}
