//! # Cart Session
//!
//! The live cart for one shopper's visit: in-memory state, mutation
//! boundary, and write-through persistence.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Session Operations                             │
//! │                                                                         │
//! │  Shopper Action           CartStore Method         Effect               │
//! │  ──────────────           ───────────────          ──────               │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_line() ────────────► validate            │
//! │  Change quantity ────────► set_quantity() ────────►   │                 │
//! │  Click remove ───────────► remove_line() ─────────►   ▼                 │
//! │  Empty cart ─────────────► clear() ───────────────► Cart::apply (pure)  │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                                snapshot saved to SQLite │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                                CartEvent broadcast      │
//! │                                                                         │
//! │  A mutation that fails validation or persistence leaves the in-memory  │
//! │  cart exactly as it was and emits no event.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<Cart>>` so concurrent tasks serialize
//! their mutations. The tokio mutex is held across the persistence await,
//! which guarantees snapshots reach storage in mutation order.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use spicehouse_core::{
    validation, Cart, CartCommand, CartLine, CartSnapshot, CartTotals, CoreError, ProductSize,
    MAX_LINE_QUANTITY,
};

use crate::error::StoreResult;
use crate::pool::Storage;
use crate::repository::cart::CartSnapshotRepository;

/// Capacity of the cart event channel. Events are transient UI signals;
/// a slow subscriber lagging past this many events just skips ahead.
const EVENT_CHANNEL_CAPACITY: usize = 16;

// =============================================================================
// Cart Events
// =============================================================================

/// A confirmation signal emitted after a successful cart mutation.
///
/// Subscribers use these to show transient feedback ("Rasam Powder added
/// to cart"). Events fire only after the mutation has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// A line was added (or merged into an existing line).
    LineAdded {
        product_id: String,
        name: String,
        size: ProductSize,
        quantity: i64,
    },

    /// A line was removed.
    LineRemoved {
        product_id: String,
        size: ProductSize,
    },

    /// A line's quantity changed.
    QuantityChanged {
        product_id: String,
        size: ProductSize,
        quantity: i64,
    },

    /// The cart was emptied.
    Cleared,
}

// =============================================================================
// Cart Store
// =============================================================================

/// The shopper's cart session.
///
/// Owns the in-memory cart, validates every mutation at the boundary,
/// writes a full snapshot through to SQLite after each change, and
/// broadcasts a [`CartEvent`] once the change is durable.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
    repo: CartSnapshotRepository,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    /// Opens the cart session, rehydrating any persisted cart.
    ///
    /// An absent or unreadable snapshot starts the session with an empty
    /// cart; the session never fails to open because of stale data.
    pub async fn open(storage: &Storage) -> StoreResult<Self> {
        let repo = storage.cart();
        let cart = repo.load().await?;

        info!(
            lines = cart.line_count(),
            total_cents = cart.totals.total_cents,
            "Cart session opened"
        );

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(CartStore {
            cart: Arc::new(Mutex::new(cart)),
            repo,
            events,
        })
    }

    /// Subscribes to cart confirmation events.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a line to the cart, merging quantities on an existing key.
    ///
    /// ## Validation
    /// - `line.quantity` must be in `1..=MAX_LINE_QUANTITY`, including the
    ///   merged total when the key already exists
    /// - `line.unit_price_cents` must not be negative
    /// - A new key must not push the cart past its line limit
    pub async fn add_line(&self, line: CartLine) -> StoreResult<CartTotals> {
        validation::validate_quantity(line.quantity).map_err(CoreError::from)?;
        validation::validate_price_cents(line.unit_price_cents).map_err(CoreError::from)?;

        let mut cart = self.cart.lock().await;

        match cart.line(&line.product_id, line.size) {
            Some(existing) => {
                let merged = existing.quantity + line.quantity;
                if merged > MAX_LINE_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: merged,
                        max: MAX_LINE_QUANTITY,
                    }
                    .into());
                }
            }
            None => {
                validation::validate_cart_size(cart.line_count()).map_err(CoreError::from)?;
            }
        }

        let event = CartEvent::LineAdded {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            size: line.size,
            quantity: line.quantity,
        };

        let next = cart.apply(&CartCommand::Add(line));
        self.commit(&mut cart, next, event).await
    }

    /// Removes a line by its identity key. No-op if the key is absent.
    pub async fn remove_line(
        &self,
        product_id: &str,
        size: ProductSize,
    ) -> StoreResult<CartTotals> {
        let mut cart = self.cart.lock().await;

        if cart.line(product_id, size).is_none() {
            debug!(product_id, "Remove ignored, line not in cart");
            return Ok(cart.totals);
        }

        let event = CartEvent::LineRemoved {
            product_id: product_id.to_string(),
            size,
        };

        let next = cart.apply(&CartCommand::Remove {
            product_id: product_id.to_string(),
            size,
        });
        self.commit(&mut cart, next, event).await
    }

    /// Sets the quantity of a line. No-op if the key is absent.
    pub async fn set_quantity(
        &self,
        product_id: &str,
        size: ProductSize,
        quantity: i64,
    ) -> StoreResult<CartTotals> {
        validation::validate_quantity(quantity).map_err(CoreError::from)?;

        let mut cart = self.cart.lock().await;

        if cart.line(product_id, size).is_none() {
            debug!(product_id, "Quantity change ignored, line not in cart");
            return Ok(cart.totals);
        }

        let event = CartEvent::QuantityChanged {
            product_id: product_id.to_string(),
            size,
            quantity,
        };

        let next = cart.apply(&CartCommand::SetQuantity {
            product_id: product_id.to_string(),
            size,
            quantity,
        });
        self.commit(&mut cart, next, event).await
    }

    /// Empties the cart.
    pub async fn clear(&self) -> StoreResult<()> {
        let mut cart = self.cart.lock().await;

        let next = cart.apply(&CartCommand::Clear);
        self.commit(&mut cart, next, CartEvent::Cleared).await?;
        Ok(())
    }

    /// Persists the next state, then swaps it in and emits the event.
    ///
    /// Ordering matters: if the snapshot write fails, the in-memory cart
    /// keeps the previous state and no event fires.
    async fn commit(
        &self,
        cart: &mut Cart,
        next: Cart,
        event: CartEvent,
    ) -> StoreResult<CartTotals> {
        self.repo.save(&CartSnapshot::from(&next)).await?;

        *cart = next;
        let totals = cart.totals;

        // Nobody listening is fine; events are best-effort signals.
        let _ = self.events.send(event);

        Ok(totals)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns a copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Returns the current derived totals.
    pub async fn totals(&self) -> CartTotals {
        self.cart.lock().await.totals
    }

    /// Whether the cart currently has no lines.
    pub async fn is_empty(&self) -> bool {
        self.cart.lock().await.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StorageConfig;

    async fn open_store() -> (Storage, CartStore) {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let store = CartStore::open(&storage).await.unwrap();
        (storage, store)
    }

    fn line(product_id: &str, size: ProductSize, price: i64, qty: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            name: format!("Product {}", product_id),
            unit_price_cents: price,
            image: String::new(),
            size,
            quantity: qty,
        }
    }

    #[tokio::test]
    async fn test_add_line_updates_totals_and_persists() {
        let (storage, store) = open_store().await;

        let totals = store
            .add_line(line("rasam-powder", ProductSize::Trial, 500, 3))
            .await
            .unwrap();

        assert_eq!(totals.subtotal_cents, 1500);
        assert_eq!(totals.discount_cents, 500);
        assert_eq!(totals.total_cents, 1000);

        // A fresh session over the same storage sees the mutation.
        let reopened = CartStore::open(&storage).await.unwrap();
        assert_eq!(reopened.totals().await, totals);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_quantity_without_mutating() {
        let (_storage, store) = open_store().await;

        let err = store
            .add_line(line("rasam-powder", ProductSize::Full, 999, 0))
            .await;
        assert!(err.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_merged_quantity_cannot_exceed_line_maximum() {
        let (_storage, store) = open_store().await;

        store
            .add_line(line("rasam-powder", ProductSize::Full, 999, 998))
            .await
            .unwrap();

        let err = store
            .add_line(line("rasam-powder", ProductSize::Full, 999, 2))
            .await;
        assert!(err.is_err());

        // The existing line is untouched.
        let cart = store.snapshot().await;
        assert_eq!(cart.total_quantity(), 998);
    }

    #[tokio::test]
    async fn test_remove_absent_line_is_noop() {
        let (_storage, store) = open_store().await;

        store
            .add_line(line("rasam-powder", ProductSize::Full, 999, 1))
            .await
            .unwrap();

        let totals = store
            .remove_line("sambar-powder", ProductSize::Full)
            .await
            .unwrap();
        assert_eq!(totals.subtotal_cents, 999);
        assert_eq!(store.snapshot().await.line_count(), 1);
    }

    #[tokio::test]
    async fn test_set_quantity_persists_across_reopen() {
        let (storage, store) = open_store().await;

        store
            .add_line(line("rasam-powder", ProductSize::Full, 999, 1))
            .await
            .unwrap();
        store
            .set_quantity("rasam-powder", ProductSize::Full, 4)
            .await
            .unwrap();

        let reopened = CartStore::open(&storage).await.unwrap();
        let cart = reopened.snapshot().await;
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.totals.subtotal_cents, 3996);
    }

    #[tokio::test]
    async fn test_set_quantity_rejects_zero_and_negative() {
        let (_storage, store) = open_store().await;

        store
            .add_line(line("rasam-powder", ProductSize::Full, 999, 2))
            .await
            .unwrap();

        assert!(store
            .set_quantity("rasam-powder", ProductSize::Full, 0)
            .await
            .is_err());
        assert!(store
            .set_quantity("rasam-powder", ProductSize::Full, -3)
            .await
            .is_err());

        // Rejected before mutating.
        assert_eq!(store.snapshot().await.total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_cart() {
        let (storage, store) = open_store().await;

        store
            .add_line(line("rasam-powder", ProductSize::Trial, 500, 3))
            .await
            .unwrap();
        store.clear().await.unwrap();

        let reopened = CartStore::open(&storage).await.unwrap();
        assert!(reopened.is_empty().await);
        assert_eq!(reopened.totals().await.total_cents, 0);
    }

    #[tokio::test]
    async fn test_mutations_emit_confirmation_events() {
        let (_storage, store) = open_store().await;
        let mut events = store.subscribe();

        store
            .add_line(line("rasam-powder", ProductSize::Trial, 500, 2))
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            CartEvent::LineAdded {
                product_id: "rasam-powder".to_string(),
                name: "Product rasam-powder".to_string(),
                size: ProductSize::Trial,
                quantity: 2,
            }
        );

        store.clear().await.unwrap();
        assert_eq!(events.recv().await.unwrap(), CartEvent::Cleared);
    }

    #[tokio::test]
    async fn test_failed_mutation_emits_no_event() {
        let (_storage, store) = open_store().await;
        let mut events = store.subscribe();

        let _ = store
            .add_line(line("rasam-powder", ProductSize::Full, -1, 1))
            .await;

        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
