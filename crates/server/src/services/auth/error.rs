//! Authentication error types.

use thiserror::Error;

use shortcakes_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password combination is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account exists for the email.
    #[error("customer not found")]
    CustomerNotFound,

    /// Bearer token is unknown or expired.
    #[error("invalid token")]
    InvalidToken,

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Password doesn't meet the policy.
    #[error("{0}")]
    WeakPassword(String),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Reset code is wrong, consumed, or has run out of attempts.
    #[error("invalid reset code")]
    InvalidResetCode,

    /// Reset code is past its expiry.
    #[error("reset code expired")]
    ResetCodeExpired,

    /// Underlying repository failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing failure.
    #[error("hash error: {0}")]
    Hash(String),
}
