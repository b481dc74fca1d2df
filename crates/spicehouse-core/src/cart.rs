//! # Cart Module
//!
//! The cart state machine: lines, commands, and the pure transition.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Command Flow                                  │
//! │                                                                         │
//! │  Shopper Action            CartCommand             State Change         │
//! │  ──────────────            ───────────             ────────────         │
//! │                                                                         │
//! │  "Add to cart" ──────────► Add(line) ────────────► merge or append     │
//! │                                                                         │
//! │  Change quantity ────────► SetQuantity { .. } ───► line.quantity = n   │
//! │                                                                         │
//! │  Click remove ───────────► Remove { .. } ────────► retain others       │
//! │                                                                         │
//! │  Empty cart ─────────────► Clear ────────────────► lines = []          │
//! │                                                                         │
//! │  Every transition ends with a full totals recompute via the pricing    │
//! │  calculator; the discount is never carried over from the prior state.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Commands?
//! `Cart::apply` is a pure function from `(state, command)` to the next
//! state. The persist-after-mutation effect lives in `spicehouse-store`,
//! which keeps every transition testable without storage.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::pricing;
use crate::types::ProductSize;

// =============================================================================
// Cart Line
// =============================================================================

/// One distinct `(product_id, size)` entry in the cart.
///
/// ## Identity
/// Two lines with the same product but different sizes are distinct;
/// adding a line whose key matches an existing one merges quantities.
///
/// ## Price Freezing
/// `unit_price_cents` is captured when the line is built (see
/// [`crate::catalog::Product::cart_line`]). A later catalog price change
/// does not reprice lines already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product identifier (catalog slug).
    pub product_id: String,

    /// Display name at time of adding (frozen).
    pub name: String,

    /// Unit price in cents at time of adding (frozen). Never negative.
    pub unit_price_cents: i64,

    /// Image reference for cart display.
    pub image: String,

    /// Size variant; part of the line's identity key.
    pub size: ProductSize,

    /// Units of this line. Always >= 1.
    pub quantity: i64,
}

impl CartLine {
    /// Whether this line matches the given identity key.
    #[inline]
    pub fn matches(&self, product_id: &str, size: ProductSize) -> bool {
        self.product_id == product_id && self.size == size
    }

    /// Unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived totals for a line list.
///
/// ## Invariants
/// - `subtotal_cents = Σ(unit_price_cents * quantity)`
/// - `total_cents = subtotal_cents - discount_cents`
/// - `discount_cents >= 0`, always re-derived from the lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl CartTotals {
    /// Subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Promotion discount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Total (subtotal minus discount) as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Cart Command
// =============================================================================

/// A cart mutation, expressed as data.
///
/// Commands make every possible mutation enumerable and serializable:
/// a tag plus a typed payload, dispatched to one pure transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartCommand {
    /// Add a line; merges quantities when the `(product_id, size)` key
    /// already exists. Caller contract: `line.quantity >= 1`.
    Add(CartLine),

    /// Remove the line with the given key. No-op if absent.
    Remove {
        product_id: String,
        size: ProductSize,
    },

    /// Set the quantity of the line with the given key. No-op if absent.
    /// Caller contract: `quantity >= 1`.
    SetQuantity {
        product_id: String,
        size: ProductSize,
        quantity: i64,
    },

    /// Empty the cart.
    Clear,
}

// =============================================================================
// Cart
// =============================================================================

/// The cart: an insertion-ordered line list plus derived totals.
///
/// ## Invariants
/// - Lines are unique by `(product_id, size)`
/// - Line order is insertion order (it is display order; stable)
/// - `totals` always reflects `lines` (recomputed on every transition)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in display (insertion) order.
    pub lines: Vec<CartLine>,

    /// Derived totals; never stored independently of `lines`.
    pub totals: CartTotals,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from a bare line list, recomputing totals.
    ///
    /// Used when rehydrating persisted state: stored totals are advisory
    /// and a stale discount must never survive a reload.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let totals = pricing::price_lines(&lines);
        Cart { lines, totals }
    }

    /// Pure transition: applies a command and returns the next state.
    ///
    /// Total over its input domain; contract violations (quantity < 1)
    /// are screened out by the caller before a command is built.
    #[must_use]
    pub fn apply(&self, command: &CartCommand) -> Cart {
        let mut lines = self.lines.clone();

        match command {
            CartCommand::Add(line) => {
                if let Some(existing) = lines
                    .iter_mut()
                    .find(|l| l.matches(&line.product_id, line.size))
                {
                    existing.quantity += line.quantity;
                } else {
                    lines.push(line.clone());
                }
            }
            CartCommand::Remove { product_id, size } => {
                lines.retain(|l| !l.matches(product_id, *size));
            }
            CartCommand::SetQuantity {
                product_id,
                size,
                quantity,
            } => {
                if let Some(existing) = lines.iter_mut().find(|l| l.matches(product_id, *size)) {
                    existing.quantity = *quantity;
                }
            }
            CartCommand::Clear => lines.clear(),
        }

        Cart::from_lines(lines)
    }

    /// Looks up a line by its identity key.
    pub fn line(&self, product_id: &str, size: ProductSize) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(product_id, size))
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// The persisted shape of a cart: the line list plus flattened totals.
///
/// ## Why Flattened?
/// The durable blob keeps `{ lines, subtotal, discount, total }` so it can
/// be inspected without knowing the in-memory layout. On rehydration the
/// totals are advisory only: [`CartSnapshot::into_cart`] recomputes them
/// from the lines, so a stale persisted discount can never survive a
/// reload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            lines: cart.lines.clone(),
            subtotal_cents: cart.totals.subtotal_cents,
            discount_cents: cart.totals.discount_cents,
            total_cents: cart.totals.total_cents,
        }
    }
}

impl CartSnapshot {
    /// Rebuilds the live cart, re-deriving totals from the lines.
    pub fn into_cart(self) -> Cart {
        Cart::from_lines(self.lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, size: ProductSize, price_cents: i64, qty: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            name: format!("Product {}", product_id),
            unit_price_cents: price_cents,
            image: format!("/img/{}.jpg", product_id),
            size,
            quantity: qty,
        }
    }

    #[test]
    fn test_add_appends_new_line() {
        let cart = Cart::new().apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 2)));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.totals.subtotal_cents, 1998);
        assert_eq!(cart.totals.total_cents, 1998);
    }

    #[test]
    fn test_add_same_key_merges_quantities() {
        let cart = Cart::new()
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 2)))
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 3)));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_same_product_different_size_stays_distinct() {
        let cart = Cart::new()
            .apply(&CartCommand::Add(line("a", ProductSize::Trial, 499, 1)))
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 1)));

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.totals.subtotal_cents, 1498);
    }

    #[test]
    fn test_display_order_is_insertion_order() {
        let cart = Cart::new()
            .apply(&CartCommand::Add(line("b", ProductSize::Full, 500, 1)))
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 300, 1)))
            .apply(&CartCommand::Add(line("c", ProductSize::Trial, 200, 1)))
            // Merging must not reorder.
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 300, 1)));

        let order: Vec<&str> = cart.lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_subtotal_is_order_independent() {
        let forward = Cart::new()
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 2)))
            .apply(&CartCommand::Add(line("b", ProductSize::Full, 500, 1)));
        let reverse = Cart::new()
            .apply(&CartCommand::Add(line("b", ProductSize::Full, 500, 1)))
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 2)));

        assert_eq!(
            forward.totals.subtotal_cents,
            reverse.totals.subtotal_cents
        );
        assert_eq!(forward.totals.subtotal_cents, 2498);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let cart = Cart::new().apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 1)));
        let next = cart.apply(&CartCommand::Remove {
            product_id: "missing".to_string(),
            size: ProductSize::Full,
        });

        assert_eq!(next, cart);
    }

    #[test]
    fn test_remove_targets_only_the_matching_size() {
        let cart = Cart::new()
            .apply(&CartCommand::Add(line("a", ProductSize::Trial, 499, 1)))
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 1)))
            .apply(&CartCommand::Remove {
                product_id: "a".to_string(),
                size: ProductSize::Trial,
            });

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].size, ProductSize::Full);
    }

    #[test]
    fn test_set_quantity_recomputes_totals() {
        let cart = Cart::new()
            .apply(&CartCommand::Add(line("a", ProductSize::Full, 999, 1)))
            .apply(&CartCommand::SetQuantity {
                product_id: "a".to_string(),
                size: ProductSize::Full,
                quantity: 4,
            });

        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.totals.subtotal_cents, 3996);
    }

    #[test]
    fn test_clear_resets_totals_to_zero() {
        let cart = Cart::new()
            .apply(&CartCommand::Add(line("a", ProductSize::Trial, 499, 3)))
            .apply(&CartCommand::Clear);

        assert!(cart.is_empty());
        assert_eq!(cart.totals, CartTotals::default());
    }

    #[test]
    fn test_from_lines_rederives_totals() {
        // Totals are never trusted from outside; from_lines always recomputes.
        let cart = Cart::from_lines(vec![line("a", ProductSize::Full, 1000, 2)]);
        assert_eq!(cart.totals.subtotal_cents, 2000);
        assert_eq!(cart.totals.discount_cents, 0);
        assert_eq!(cart.totals.total_cents, 2000);
    }

    #[test]
    fn test_snapshot_roundtrip_ignores_stale_totals() {
        let cart = Cart::new().apply(&CartCommand::Add(line("a", ProductSize::Trial, 1000, 3)));
        let mut snapshot = CartSnapshot::from(&cart);
        assert_eq!(snapshot.discount_cents, 1000);

        // Tamper with persisted totals; rehydration must re-derive them.
        snapshot.discount_cents = 0;
        snapshot.total_cents = 9999;

        let reloaded = snapshot.into_cart();
        assert_eq!(reloaded.totals.discount_cents, 1000);
        assert_eq!(reloaded.totals.total_cents, 2000);
    }
}
