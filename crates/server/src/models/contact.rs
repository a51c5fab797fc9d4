//! Contact message domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shortcakes_core::ContactMessageId;

/// A message submitted through the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Unique message ID.
    pub id: ContactMessageId,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Whether an admin has read the message.
    pub is_read: bool,
    /// When the message was submitted.
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a contact message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}
