//! Authentication service.
//!
//! Password login with argon2 hashing, opaque bearer tokens, and the OTP
//! password reset flow. Tokens and reset codes are stored hashed (SHA-256);
//! the plaintext only ever travels to the client.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use shortcakes_core::{Email, Role};

use crate::db::{AuthRepository, CustomerRepository, RepositoryError};
use crate::models::customer::{Customer, CurrentCustomer};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Bearer token lifetime.
const TOKEN_TTL_DAYS: i64 = 30;

/// Reset code lifetime.
const RESET_TTL_MINUTES: i64 = 15;

/// Maximum verification attempts before a reset code is invalidated.
pub const MAX_RESET_ATTEMPTS: i32 = 3;

/// Authentication service.
///
/// Handles registration, login, bearer tokens, and password resets.
pub struct AuthService<'a> {
    customers: CustomerRepository<'a>,
    auth: AuthRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            auth: AuthRepository::new(pool),
        }
    }

    // =========================================================================
    // Registration & login
    // =========================================================================

    /// Register a new customer with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<Customer, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let customer = self
            .customers
            .create(
                &email,
                &password_hash,
                first_name,
                last_name,
                phone,
                Role::Customer,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(customer)
    }

    /// Login with email and password, issuing a bearer token.
    ///
    /// Returns the customer and the plaintext token to hand to the client.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Customer, String), AuthError> {
        let email = Email::parse(email)?;

        let (customer, password_hash) = self
            .customers
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = generate_token();
        let expires_at = Utc::now() + Duration::days(TOKEN_TTL_DAYS);
        self.auth
            .insert_token(customer.id, &hash_token(&token), expires_at)
            .await?;

        Ok((customer, token))
    }

    /// Revoke a bearer token (logout). Unknown tokens are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.auth.revoke_token(&hash_token(token)).await?;
        Ok(())
    }

    /// Resolve a bearer token to its customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for unknown or expired tokens.
    pub async fn resolve_token(&self, token: &str) -> Result<CurrentCustomer, AuthError> {
        self.auth
            .resolve_token(&hash_token(token))
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    // =========================================================================
    // Password reset (OTP)
    // =========================================================================

    /// Start a password reset: generate a code and store its hash with a
    /// 15-minute expiry, superseding any active code.
    ///
    /// Returns `None` when no account exists for the email, so callers can
    /// answer uniformly without leaking which addresses are registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn request_reset(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<Customer>, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };
        let Some(customer) = self.customers.get_by_email(&email).await? else {
            return Ok(None);
        };

        let expires_at = Utc::now() + Duration::minutes(RESET_TTL_MINUTES);
        self.auth
            .create_reset(customer.id, &hash_token(code), expires_at)
            .await?;

        Ok(Some(customer))
    }

    /// Verify a reset code and set the new password.
    ///
    /// A code survives at most [`MAX_RESET_ATTEMPTS`] failed verifications;
    /// after that it is rejected even when correct. A successful
    /// verification consumes the code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidResetCode` for a wrong, consumed, or
    /// exhausted code, `AuthError::ResetCodeExpired` past the expiry.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        validate_password(new_password)?;

        let customer = self
            .customers
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidResetCode)?;

        let reset = self
            .auth
            .get_active_reset(customer.id)
            .await?
            .ok_or(AuthError::InvalidResetCode)?;

        if reset.expires_at <= Utc::now() {
            return Err(AuthError::ResetCodeExpired);
        }
        if reset.attempts >= MAX_RESET_ATTEMPTS {
            return Err(AuthError::InvalidResetCode);
        }
        if hash_token(code) != reset.code_hash {
            self.auth.record_failed_attempt(reset.id).await?;
            return Err(AuthError::InvalidResetCode);
        }

        self.auth.mark_reset_used(reset.id).await?;
        let password_hash = hash_password(new_password)?;
        self.customers
            .set_password_hash(customer.id, &password_hash)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Password hashing
// =============================================================================

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2.
///
/// Public so the CLI can create admin accounts with properly hashed
/// credentials.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

// =============================================================================
// Token helpers
// =============================================================================

/// Generate an opaque bearer token: 32 random bytes, base64url.
#[must_use]
pub fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hex digest used to store tokens and reset codes.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Expiry timestamp helper for newly issued tokens.
#[must_use]
pub fn token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(TOKEN_TTL_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").expect("hashing succeeds");
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_generate_token_is_opaque_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 32 bytes base64url without padding is 43 chars
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let h1 = hash_token("123456");
        let h2 = hash_token("123456");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash_token("123457"), h1);
    }

    #[test]
    fn test_token_expiry_in_future() {
        let now = Utc::now();
        assert!(token_expiry(now) > now);
    }
}
