//! Guest cart token extractor.
//!
//! Guests carry their cart in the `X-Cart-Token` header. The token is
//! minted server-side when the first cart is created and echoed back in
//! the cart response.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the guest cart token.
pub const CART_TOKEN_HEADER: &str = "x-cart-token";

/// Extractor for the optional guest cart token.
pub struct CartToken(pub Option<Uuid>);

impl<S> FromRequestParts<S> for CartToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(CART_TOKEN_HEADER) else {
            return Ok(Self(None));
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AppError::BadRequest("invalid cart token".to_string()))?;

        Ok(Self(Some(token)))
    }
}
