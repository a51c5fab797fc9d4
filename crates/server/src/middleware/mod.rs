//! Request extractors and middleware.

pub mod auth;
pub mod cart_token;

pub use auth::{OptionalCustomer, RequireAdmin, RequireCustomer};
pub use cart_token::CartToken;
