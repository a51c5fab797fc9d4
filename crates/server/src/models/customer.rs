//! Customer domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shortcakes_core::{AddressId, CustomerId, Email, Role};

/// A registered customer (or admin) account.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Email address (unique, lowercased).
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Account role.
    pub role: Role,
    /// Optional profile picture path (relative to the upload root).
    pub profile_picture: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The authenticated principal resolved from a bearer token.
///
/// Stored in request extensions by the auth extractors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Customer ID.
    pub id: CustomerId,
    /// Email address.
    pub email: Email,
    /// Account role.
    pub role: Role,
}

impl From<&Customer> for CurrentCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            email: customer.email.clone(),
            role: customer.role,
        }
    }
}

/// A saved customer address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Label shown in the address book (e.g. "Home").
    pub label: String,
    /// Street and house number.
    pub street: String,
    /// City.
    pub city: String,
    /// Postal code, used for delivery zone matching.
    pub postal_code: String,
    /// Optional courier notes.
    pub notes: Option<String>,
    /// Whether this is the default address.
    pub is_default: bool,
}

/// Input for creating an address.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAddressInput {
    pub label: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Input for updating an address. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAddressInput {
    pub label: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
    pub is_default: Option<bool>,
}

/// Input for updating profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}
