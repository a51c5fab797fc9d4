//! Authentication extractors.
//!
//! Handlers take `RequireCustomer`, `RequireAdmin` or `OptionalCustomer`
//! to resolve the `Authorization: Bearer` header against the token table.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use shortcakes_core::Role;

use crate::error::AppError;
use crate::models::CurrentCustomer;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Extractor that requires a logged-in customer.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireCustomer(customer): RequireCustomer,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", customer.email)
/// }
/// ```
pub struct RequireCustomer(pub CurrentCustomer);

/// Extractor that requires an admin account.
pub struct RequireAdmin(pub CurrentCustomer);

/// Extractor that optionally resolves the current customer.
///
/// Unlike `RequireCustomer`, this does not reject unauthenticated requests.
pub struct OptionalCustomer(pub Option<CurrentCustomer>);

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the current customer from the request, if any.
async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<CurrentCustomer>, AppError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };

    let auth = AuthService::new(state.pool());
    match auth.resolve_token(token).await {
        Ok(customer) => Ok(Some(customer)),
        Err(crate::services::auth::AuthError::InvalidToken) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let customer = resolve(parts, state)
            .await?
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;
        Ok(Self(customer))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let customer = resolve(parts, state)
            .await?
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

        if customer.role != Role::Admin {
            return Err(AppError::Forbidden("admin access required".to_string()));
        }
        Ok(Self(customer))
    }
}

impl FromRequestParts<AppState> for OptionalCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve(parts, state).await?))
    }
}
