//! # Order Backend Collaborator
//!
//! The remote system of record for orders, spoken to over a
//! PostgREST-style REST surface.
//!
//! ## Tables
//! ```text
//! orders        id, user_id, status, total_cents, shipping_cents,
//!               shipping_address (JSON), payment_reference, created_at
//! order_items   order_id, product_id, product_name, product_size,
//!               price_cents, quantity
//! ```
//!
//! The remote schema itself is external; this module only posts rows
//! shaped the way the backend expects them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use spicehouse_core::{OrderItem, OrderStatus, ShippingAddress};

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Types
// =============================================================================

/// The fields the pipeline supplies when creating an order row.
///
/// The backend assigns the id and timestamp; status starts `Pending`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: String,
    pub status: OrderStatus,
    /// Amount to charge, including any shipping surcharge.
    pub total_cents: i64,
    /// Shipping surcharge portion (0 above the free-shipping threshold).
    pub shipping_cents: i64,
    pub shipping_address: ShippingAddress,
}

// =============================================================================
// Collaborator Trait
// =============================================================================

/// The order backend seam.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Creates an order row and returns its backend-assigned id.
    async fn create_order(&self, order: &NewOrder) -> CheckoutResult<String>;

    /// Inserts the order's line items in one batch.
    async fn insert_order_items(
        &self,
        order_id: &str,
        items: &[OrderItem],
    ) -> CheckoutResult<()>;

    /// Moves an order to a terminal status, attaching the payment
    /// reference when there is one.
    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        payment_reference: Option<&str>,
    ) -> CheckoutResult<()>;
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreatedOrderRow {
    id: String,
}

// =============================================================================
// HTTP Client
// =============================================================================

/// Order collaborator backed by a PostgREST-style REST surface.
pub struct HttpOrderClient {
    config: CheckoutConfig,
    client: reqwest::Client,
}

impl HttpOrderClient {
    pub fn new(config: CheckoutConfig) -> CheckoutResult<Self> {
        let client = config.http_client()?;
        Ok(HttpOrderClient { config, client })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/{}", self.config.orders_url, table)
    }
}

#[async_trait]
impl OrderApi for HttpOrderClient {
    async fn create_order(&self, order: &NewOrder) -> CheckoutResult<String> {
        info!(
            user_id = %order.user_id,
            total_cents = order.total_cents,
            shipping_cents = order.shipping_cents,
            "Creating order"
        );

        let response = self
            .client
            .post(self.endpoint("orders"))
            .header("apikey", &self.config.api_key)
            // Ask the backend to echo the inserted row so we get its id.
            .header("Prefer", "return=representation")
            .json(order)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Order insert rejected");
            return Err(CheckoutError::OrderBackend(status.to_string()));
        }

        let rows: Vec<CreatedOrderRow> = response.json().await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| CheckoutError::OrderBackend("insert returned no row".to_string()))?;

        info!(order_id = %row.id, "Order created");
        Ok(row.id)
    }

    async fn insert_order_items(
        &self,
        order_id: &str,
        items: &[OrderItem],
    ) -> CheckoutResult<()> {
        info!(order_id, count = items.len(), "Inserting order items");

        let response = self
            .client
            .post(self.endpoint("order_items"))
            .header("apikey", &self.config.api_key)
            .json(items)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(order_id, %status, "Order item insert rejected");
            return Err(CheckoutError::OrderBackend(status.to_string()));
        }

        Ok(())
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        payment_reference: Option<&str>,
    ) -> CheckoutResult<()> {
        info!(order_id, status = status.as_str(), "Updating order status");

        let response = self
            .client
            .patch(format!("{}?id=eq.{}", self.endpoint("orders"), order_id))
            .header("apikey", &self.config.api_key)
            .json(&json!({
                "status": status,
                "paymentReference": payment_reference,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let http_status = response.status();
            warn!(order_id, %http_status, "Order status update rejected");
            return Err(CheckoutError::OrderBackend(http_status.to_string()));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_wire_format() {
        let order = NewOrder {
            user_id: "u1".to_string(),
            status: OrderStatus::Pending,
            total_cents: 2500,
            shipping_cents: 500,
            shipping_address: ShippingAddress {
                full_name: "Priya Subramanian".to_string(),
                email: "priya@example.com".to_string(),
                address_line1: "12 Temple Street".to_string(),
                address_line2: None,
                city: "Austin".to_string(),
                state: "TX".to_string(),
                postal_code: "78701".to_string(),
                country: "United States".to_string(),
                phone: "+1 512 555 0182".to_string(),
            },
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["totalCents"], 2500);
        assert_eq!(json["shippingCents"], 500);
        assert_eq!(json["shippingAddress"]["city"], "Austin");
    }

    #[test]
    fn test_created_order_row_parsing() {
        let rows: Vec<CreatedOrderRow> = serde_json::from_str(r#"[{"id":"ord_1"}]"#).unwrap();
        assert_eq!(rows[0].id, "ord_1");
    }
}
