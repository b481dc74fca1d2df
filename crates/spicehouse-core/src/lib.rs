//! # spicehouse-core: Pure Business Logic for the Spicehouse Storefront
//!
//! This crate is the **heart** of the storefront. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Spicehouse Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation Shell (external)                  │   │
//! │  │    Product pages ──► Cart UI ──► Checkout UI ──► Confirmation  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ spicehouse-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ │   │
//! │  │   │  money  │ │  cart   │ │ pricing │ │ catalog │ │validation│ │   │
//! │  │   │  Money  │ │ Cart    │ │ promo + │ │ Product │ │  rules   │ │   │
//! │  │   │         │ │ CartLine│ │ shipping│ │  slugs  │ │  checks  │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     spicehouse-store (persistence) / spicehouse-checkout        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart state, commands, and the pure transition function
//! - [`pricing`] - Trial-pack promotion and shipping threshold rules
//! - [`catalog`] - Product catalog and slug lookup
//! - [`types`] - Shared domain types (addresses, orders, users)
//! - [`validation`] - Boundary validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use spicehouse_core::catalog;
//! use spicehouse_core::cart::{Cart, CartCommand};
//! use spicehouse_core::types::ProductSize;
//!
//! let product = catalog::get_by_slug("rasam-powder").unwrap();
//! let line = product.cart_line(ProductSize::Trial, 3);
//!
//! let cart = Cart::default().apply(&CartCommand::Add(line));
//!
//! // 3 trial packs trigger the buy-2-get-1-free promotion
//! assert_eq!(cart.totals.discount_cents, product.trial_price().cents());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use spicehouse_core::Money` instead of
// `use spicehouse_core::money::Money`

pub use cart::{Cart, CartCommand, CartLine, CartSnapshot, CartTotals};
pub use catalog::Product;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps order payloads a reasonable size.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Trial-pack units of one product needed to earn one free unit.
///
/// The storefront promotion is "buy 2 trial packs, get 1 free": every full
/// group of 3 trial units of a product contributes one free unit.
pub const TRIAL_PROMO_GROUP: i64 = 3;

/// Order totals at or above this amount ship free.
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 3500;

/// Flat shipping surcharge below the free-shipping threshold.
pub const SHIPPING_FEE_CENTS: i64 = 500;
