//! # Domain Types
//!
//! Core domain types used throughout the Spicehouse storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductSize    │   │     Order       │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Trial          │   │  id (UUID)      │   │  order_id (FK)  │       │
//! │  │  Full           │   │  status         │   │  product_id     │       │
//! │  │                 │   │  total_cents    │   │  price snapshot │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ShippingAddress │   │  OrderStatus    │   │  User/Session   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  full_name, ... │   │  Pending        │   │  id, email,     │       │
//! │  │  postal_code    │   │  Completed      │   │  phone, tokens  │       │
//! │  │                 │   │  Failed         │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderItem` freezes the product name, size, and unit price at the moment
//! the order is created, so a later catalog change never rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product Size
// =============================================================================

/// The two fixed product size variants with independent pricing.
///
/// A trial pack is a small sampler priced at half the full-size jar;
/// trial packs also drive the "buy 2 get 1 free" promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSize {
    /// Small sampler pack.
    Trial,
    /// Full-size jar.
    Full,
}

impl ProductSize {
    /// Stable lowercase label, matching the persisted/wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductSize::Trial => "trial",
            ProductSize::Full => "full",
        }
    }
}

impl std::fmt::Display for ProductSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

/// A shipping address collected during checkout.
///
/// Completeness is validated before checkout may enter `Submitting`
/// (see [`crate::validation::validate_shipping_address`]); the external
/// backend performs its own deeper validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order on the remote backend.
///
/// An order is created `Pending` and always finishes the checkout pipeline
/// as `Completed` or `Failed` - it is never left `Pending` indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order row exists; payment not yet resolved.
    Pending,
    /// Payment confirmed; order is done.
    Completed,
    /// Payment or a pipeline step failed; terminal.
    Failed,
}

impl OrderStatus {
    /// Stable snake_case label, as the backend stores it.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order as the remote backend records it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    /// Amount charged, including any shipping surcharge.
    pub total_cents: i64,
    /// Shipping surcharge portion of the total (0 above the threshold).
    pub shipping_cents: i64,
    pub shipping_address: ShippingAddress,
    /// External payment processor reference, once payment resolves.
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the charged total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item on an order.
/// Uses the snapshot pattern to freeze product data at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_id: String,
    pub product_id: String,
    /// Product name at order time (frozen).
    pub product_name: String,
    pub product_size: ProductSize,
    /// Unit price in cents at order time (frozen).
    pub price_cents: i64,
    pub quantity: i64,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// User & Session
// =============================================================================

/// A signed-in shopper, as reported by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Tokens returned by the authentication collaborator on sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_size_labels() {
        assert_eq!(ProductSize::Trial.as_str(), "trial");
        assert_eq!(ProductSize::Full.as_str(), "full");
        assert_eq!(ProductSize::Trial.to_string(), "trial");
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_product_size_serde_wire_format() {
        let json = serde_json::to_string(&ProductSize::Trial).unwrap();
        assert_eq!(json, "\"trial\"");

        let back: ProductSize = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(back, ProductSize::Full);
    }
}
