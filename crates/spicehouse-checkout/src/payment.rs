//! # Payment Collaborator
//!
//! Payment confirmation against an external intent-style processor.
//!
//! ## Non-goals
//! Card tokenization belongs to the processor's own elements; this module
//! only confirms a charge for an amount and reports the reference back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use spicehouse_core::Money;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Types
// =============================================================================

/// Billing details attached to a payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A successful payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// The processor's reference for the completed charge.
    pub payment_reference: String,
}

// =============================================================================
// Collaborator Trait
// =============================================================================

/// The payment collaborator seam.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Confirms a charge for the given amount.
    ///
    /// A decline returns [`CheckoutError::PaymentDeclined`]; transport or
    /// processor faults return [`CheckoutError::Payment`] or
    /// [`CheckoutError::Http`].
    async fn confirm_payment(
        &self,
        amount: Money,
        billing: &BillingDetails,
    ) -> CheckoutResult<PaymentConfirmation>;
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    status: String,
    #[serde(default)]
    decline_reason: Option<String>,
}

// =============================================================================
// HTTP Client
// =============================================================================

/// Payment collaborator backed by a Stripe-style payment-intent surface.
pub struct HttpPaymentClient {
    config: CheckoutConfig,
    client: reqwest::Client,
}

impl HttpPaymentClient {
    pub fn new(config: CheckoutConfig) -> CheckoutResult<Self> {
        let client = config.http_client()?;
        Ok(HttpPaymentClient { config, client })
    }
}

#[async_trait]
impl PaymentApi for HttpPaymentClient {
    async fn confirm_payment(
        &self,
        amount: Money,
        billing: &BillingDetails,
    ) -> CheckoutResult<PaymentConfirmation> {
        info!(amount_cents = amount.cents(), "Confirming payment");

        let response = self
            .client
            .post(format!("{}/v1/payment_intents/confirm", self.config.payment_url))
            .bearer_auth(&self.config.payment_key)
            // One key per confirmation attempt; a transport retry of the
            // same attempt must not double-charge.
            .header("Idempotency-Key", uuid::Uuid::new_v4().to_string())
            .json(&json!({
                "amount": amount.cents(),
                "currency": "usd",
                "billing_details": billing,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Payment processor returned an error");
            return Err(CheckoutError::Payment(status.to_string()));
        }

        let intent: IntentResponse = response.json().await?;

        match intent.status.as_str() {
            "succeeded" => {
                info!(reference = %intent.id, "Payment confirmed");
                Ok(PaymentConfirmation {
                    payment_reference: intent.id,
                })
            }
            "requires_payment_method" | "canceled" => {
                let reason = intent
                    .decline_reason
                    .unwrap_or_else(|| "card was declined".to_string());
                warn!(reference = %intent.id, %reason, "Payment declined");
                Err(CheckoutError::PaymentDeclined(reason))
            }
            other => {
                warn!(reference = %intent.id, status = %other, "Unexpected intent status");
                Err(CheckoutError::Payment(format!(
                    "unexpected payment status: {}",
                    other
                )))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
