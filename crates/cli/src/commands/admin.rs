//! Create admin accounts.

use tracing::info;

use shortcakes_core::{Email, Role};
use shortcakes_server::db::{self, CustomerRepository};
use shortcakes_server::services::auth::hash_password;

/// Create an admin account.
///
/// The password comes from the `-p` flag or the `SSC_ADMIN_PASSWORD`
/// environment variable.
///
/// # Errors
///
/// Returns an error if the email is invalid, the password is missing, or
/// the account already exists.
pub async fn create(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let email = Email::parse(email).map_err(|e| format!("invalid email: {e}"))?;

    let password = match password {
        Some(p) => p.to_string(),
        None => std::env::var("SSC_ADMIN_PASSWORD")
            .map_err(|_| "pass --password or set SSC_ADMIN_PASSWORD")?,
    };
    if password.len() < 8 {
        return Err("password must be at least 8 characters".into());
    }

    let password_hash = hash_password(&password).map_err(|e| e.to_string())?;

    let pool = db::create_pool(&database_url).await?;
    let customer = CustomerRepository::new(&pool)
        .create(
            &email,
            &password_hash,
            first_name,
            last_name,
            None,
            Role::Admin,
        )
        .await?;

    info!(id = %customer.id, email = %customer.email, "Admin account created");
    Ok(())
}
