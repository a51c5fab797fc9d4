//! Email service for sending transactional notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Every
//! message is sent as multipart/alternative with a plain text fallback.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::order::OrderWithItems;

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    name: &'a str,
    order_number: &'a str,
    total: String,
    fulfillment: &'a str,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    name: &'a str,
    order_number: &'a str,
    total: String,
    fulfillment: &'a str,
}

/// HTML template for the password reset code email.
#[derive(Template)]
#[template(path = "email/reset_code.html")]
struct ResetCodeHtml<'a> {
    code: &'a str,
}

/// Plain text template for the password reset code email.
#[derive(Template)]
#[template(path = "email/reset_code.txt")]
struct ResetCodeText<'a> {
    code: &'a str,
}

/// HTML template for the low stock alert email.
#[derive(Template)]
#[template(path = "email/low_stock.html")]
struct LowStockHtml<'a> {
    item_name: &'a str,
    quantity: String,
    unit: &'a str,
    threshold: String,
}

/// Plain text template for the low stock alert email.
#[derive(Template)]
#[template(path = "email/low_stock.txt")]
struct LowStockText<'a> {
    item_name: &'a str,
    quantity: String,
    unit: &'a str,
    threshold: String,
}

/// HTML template for the pickup ready email.
#[derive(Template)]
#[template(path = "email/pickup_ready.html")]
struct PickupReadyHtml<'a> {
    name: &'a str,
    order_number: &'a str,
}

/// Plain text template for the pickup ready email.
#[derive(Template)]
#[template(path = "email/pickup_ready.txt")]
struct PickupReadyText<'a> {
    name: &'a str,
    order_number: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the order confirmation email after checkout.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        order: &OrderWithItems,
    ) -> Result<(), EmailError> {
        let total = format!("{:.2}", order.order.total);
        let fulfillment = match order.order.fulfillment {
            shortcakes_core::Fulfillment::Pickup => "pickup at the bakery",
            shortcakes_core::Fulfillment::Delivery => "delivery to your address",
        };

        let html = OrderConfirmationHtml {
            name: &order.order.contact_name,
            order_number: &order.order.order_number,
            total: total.clone(),
            fulfillment,
        }
        .render()?;
        let text = OrderConfirmationText {
            name: &order.order.contact_name,
            order_number: &order.order.order_number,
            total,
            fulfillment,
        }
        .render()?;

        self.send_multipart_email(
            to,
            &format!("Your Sarah's Short Cakes order {}", order.order.order_number),
            &text,
            &html,
        )
        .await
    }

    /// Send a password reset code.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        let html = ResetCodeHtml { code }.render()?;
        let text = ResetCodeText { code }.render()?;

        self.send_multipart_email(to, "Your Sarah's Short Cakes password reset code", &text, &html)
            .await
    }

    /// Send a low-stock alert to the configured admin address.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_low_stock_alert(
        &self,
        to: &str,
        item_name: &str,
        quantity: &rust_decimal::Decimal,
        unit: &str,
        threshold: &rust_decimal::Decimal,
    ) -> Result<(), EmailError> {
        let quantity = quantity.to_string();
        let threshold = threshold.to_string();

        let html = LowStockHtml {
            item_name,
            quantity: quantity.clone(),
            unit,
            threshold: threshold.clone(),
        }
        .render()?;
        let text = LowStockText {
            item_name,
            quantity,
            unit,
            threshold,
        }
        .render()?;

        self.send_multipart_email(to, &format!("Low stock: {item_name}"), &text, &html)
            .await
    }

    /// Tell the customer their pickup order is ready.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_pickup_ready(
        &self,
        to: &str,
        name: &str,
        order_number: &str,
    ) -> Result<(), EmailError> {
        let html = PickupReadyHtml { name, order_number }.render()?;
        let text = PickupReadyText { name, order_number }.render()?;

        self.send_multipart_email(
            to,
            &format!("Order {order_number} is ready for pickup"),
            &text,
            &html,
        )
        .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Generate a 6-digit password reset code.
#[must_use]
pub fn generate_reset_code() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reset_code_format() {
        let code = generate_reset_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_reset_code_range() {
        for _ in 0..100 {
            let code: u32 = generate_reset_code().parse().expect("valid number");
            assert!(code >= 100_000);
            assert!(code < 1_000_000);
        }
    }
}
