//! # spicehouse-store: Local Persistence for the Spicehouse Storefront
//!
//! This crate provides the durable client-side cart state. It uses SQLite
//! as the local key-value store and owns the live [`CartStore`] session.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Spicehouse Cart Data Flow                           │
//! │                                                                         │
//! │  Shell action (add to cart)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 spicehouse-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   CartStore   │    │   Repository     │   │ Migrations  │  │   │
//! │  │   │ (session.rs)  │───►│ (repository/)    │   │ (embedded)  │  │   │
//! │  │   │               │    │                  │   │             │  │   │
//! │  │   │ validate →    │    │ save/load one    │   │ 0001_cart_  │  │   │
//! │  │   │ apply → emit  │    │ JSON snapshot    │   │ snapshot.sql│  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (the browser-localStorage analog for a native shell)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Cart snapshot repository
//! - [`session`] - The live `CartStore` (authoritative in-memory cart)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spicehouse_store::{CartStore, Storage, StorageConfig};
//!
//! let storage = Storage::new(StorageConfig::new("spicehouse.db")).await?;
//! let cart = CartStore::open(&storage).await?;
//!
//! cart.add_line(product.cart_line(ProductSize::Trial, 3)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Storage, StorageConfig};
pub use repository::cart::CartSnapshotRepository;
pub use session::{CartEvent, CartStore};

/// Fixed key under which the one cart snapshot lives.
///
/// There is exactly one shopper per local store, so one well-known key
/// holds the whole cart; writes are last-write-wins upserts.
pub const CART_SNAPSHOT_KEY: &str = "spice-cart";
