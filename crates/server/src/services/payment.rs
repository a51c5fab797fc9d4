//! Simulated payment gateway.
//!
//! This is explicitly a stand-in for a real payment provider: it waits a
//! configured delay, then approves card payments with a configured
//! probability (0.8 by default), minting a fake transaction ID. Cash
//! payments are always accepted and settle at pickup/delivery.

use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;

use shortcakes_core::PaymentMethod;

use crate::config::PaymentConfig;
use crate::models::order::CardDetails;

/// Errors from the simulated gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The (simulated) issuer declined the charge.
    #[error("Payment declined: {reason}")]
    Declined { reason: String },

    /// Card payment requested without card details.
    #[error("Card details are required for card payments")]
    MissingCardDetails,

    /// Card details failed basic validation.
    #[error("Invalid card details: {0}")]
    InvalidCard(String),
}

/// Result of a successful charge.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// Gateway transaction ID; `None` for cash (settled offline).
    pub transaction_id: Option<String>,
}

/// Simulated payment gateway.
#[derive(Debug, Clone)]
pub struct PaymentService {
    delay: Duration,
    success_rate: f64,
}

impl PaymentService {
    /// Create a gateway from configuration.
    #[must_use]
    pub const fn new(config: &PaymentConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.sim_delay_ms),
            success_rate: config.sim_success_rate,
        }
    }

    /// Charge an order.
    ///
    /// Cash returns immediately with no transaction ID. Card waits the
    /// simulated gateway latency, validates the card shape, then approves
    /// with the configured probability.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Declined` when the simulated issuer declines,
    /// `MissingCardDetails`/`InvalidCard` on bad input.
    pub async fn charge(
        &self,
        method: PaymentMethod,
        amount: Decimal,
        card: Option<&CardDetails>,
    ) -> Result<PaymentReceipt, PaymentError> {
        match method {
            PaymentMethod::Cash => Ok(PaymentReceipt {
                transaction_id: None,
            }),
            PaymentMethod::Card => {
                let card = card.ok_or(PaymentError::MissingCardDetails)?;
                validate_card(card)?;

                tokio::time::sleep(self.delay).await;

                let roll: f64 = rand::rng().random();
                if roll < self.success_rate {
                    let transaction_id = generate_transaction_id();
                    tracing::info!(
                        %amount,
                        transaction_id = %transaction_id,
                        "Simulated card payment approved"
                    );
                    Ok(PaymentReceipt {
                        transaction_id: Some(transaction_id),
                    })
                } else {
                    tracing::warn!(%amount, "Simulated card payment declined");
                    Err(PaymentError::Declined {
                        reason: "card declined by issuer".to_string(),
                    })
                }
            }
        }
    }
}

/// Basic shape validation: 12-19 digits, non-empty expiry and cvc.
fn validate_card(card: &CardDetails) -> Result<(), PaymentError> {
    let digits: String = card.number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() < 12 || digits.len() > 19 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(PaymentError::InvalidCard("card number".to_string()));
    }
    if card.expiry.trim().is_empty() {
        return Err(PaymentError::InvalidCard("expiry".to_string()));
    }
    if card.cvc.trim().is_empty() {
        return Err(PaymentError::InvalidCard("cvc".to_string()));
    }
    Ok(())
}

/// Generate a fake transaction ID of the form `TXN-<12 uppercase hex>`.
#[must_use]
pub fn generate_transaction_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..12)
        .map(|_| {
            let v: u8 = rng.random_range(0..16);
            char::from_digit(u32::from(v), 16)
                .unwrap_or('0')
                .to_ascii_uppercase()
        })
        .collect();
    format!("TXN-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaymentConfig;

    fn service(success_rate: f64) -> PaymentService {
        PaymentService::new(&PaymentConfig {
            sim_delay_ms: 0,
            sim_success_rate: success_rate,
        })
    }

    fn card() -> CardDetails {
        CardDetails {
            number: "4242 4242 4242 4242".to_string(),
            expiry: "12/27".to_string(),
            cvc: "123".to_string(),
        }
    }

    #[test]
    fn test_transaction_id_format() {
        let id = generate_transaction_id();
        assert!(id.starts_with("TXN-"));
        assert_eq!(id.len(), 16);
        assert!(
            id.trim_start_matches("TXN-")
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
        );
    }

    #[tokio::test]
    async fn test_cash_always_accepted() {
        let receipt = service(0.0)
            .charge(PaymentMethod::Cash, "10.00".parse().expect("decimal"), None)
            .await
            .expect("cash never declines");
        assert!(receipt.transaction_id.is_none());
    }

    #[tokio::test]
    async fn test_card_success_at_full_rate() {
        let receipt = service(1.0)
            .charge(
                PaymentMethod::Card,
                "10.00".parse().expect("decimal"),
                Some(&card()),
            )
            .await
            .expect("always approves at rate 1.0");
        let id = receipt.transaction_id.expect("card payments get a txn id");
        assert!(id.starts_with("TXN-"));
    }

    #[tokio::test]
    async fn test_card_declined_at_zero_rate() {
        let result = service(0.0)
            .charge(
                PaymentMethod::Card,
                "10.00".parse().expect("decimal"),
                Some(&card()),
            )
            .await;
        assert!(matches!(result, Err(PaymentError::Declined { .. })));
    }

    #[tokio::test]
    async fn test_card_requires_details() {
        let result = service(1.0)
            .charge(PaymentMethod::Card, "10.00".parse().expect("decimal"), None)
            .await;
        assert!(matches!(result, Err(PaymentError::MissingCardDetails)));
    }

    #[tokio::test]
    async fn test_card_shape_validation() {
        let bad = CardDetails {
            number: "42".to_string(),
            expiry: "12/27".to_string(),
            cvc: "123".to_string(),
        };
        let result = service(1.0)
            .charge(
                PaymentMethod::Card,
                "10.00".parse().expect("decimal"),
                Some(&bad),
            )
            .await;
        assert!(matches!(result, Err(PaymentError::InvalidCard(_))));
    }
}
