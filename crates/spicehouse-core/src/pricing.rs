//! # Pricing Module
//!
//! The discount calculator and the shipping threshold rule.
//!
//! ## Promotion: "Buy 2 Trial Packs, Get 1 Free"
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Trial-Pack Promotion Calculation                        │
//! │                                                                         │
//! │  Cart lines                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. subtotal = Σ unit_price × quantity        (all lines)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Sum trial-size quantities per product                               │
//! │     rasam: 3 trial  ── 3 units ⇒ 1 free                                │
//! │     sambar: 2 trial ── below threshold, no free units                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. discount = Σ free_units × reference_price                           │
//! │       │        (reference = FIRST trial line in the cart; see below)    │
//! │       ▼                                                                 │
//! │  4. total = subtotal - discount                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The promotion is quantity-triggered and automatic - no coupon, no hidden
//! state. Recomputing on every mutation always yields the same totals for
//! the same lines.
//!
//! ## The Reference-Price Quirk
//! Free units are valued at the price of the first trial-size line in the
//! whole cart, not at the earning product's own trial price. This is
//! long-standing storefront behavior, not an accident of this rewrite. Carts where all trial packs share one price (the common
//! case here - every trial pack is half of a uniform full price) are
//! unaffected; mixed-price carts inherit the quirk. We reproduce it
//! literally and pin it with tests so any future correction is deliberate.

use crate::cart::{CartLine, CartTotals};
use crate::money::Money;
use crate::types::ProductSize;
use crate::{FREE_SHIPPING_THRESHOLD_CENTS, SHIPPING_FEE_CENTS, TRIAL_PROMO_GROUP};

// =============================================================================
// Discount Calculator
// =============================================================================

/// Computes subtotal, promotion discount, and total for a line list.
///
/// Pure and total: any line list (given the caller contract of
/// non-negative prices and positive quantities) produces valid totals.
pub fn price_lines(lines: &[CartLine]) -> CartTotals {
    let subtotal_cents: i64 = lines.iter().map(|l| l.line_total().cents()).sum();

    let discount_cents = trial_pack_discount(lines).cents();

    CartTotals {
        subtotal_cents,
        discount_cents,
        total_cents: subtotal_cents - discount_cents,
    }
}

/// Discount earned by the trial-pack promotion.
///
/// Every full group of [`TRIAL_PROMO_GROUP`] trial units of one product
/// earns one free unit, valued at the reference price (the first trial
/// line in the cart).
fn trial_pack_discount(lines: &[CartLine]) -> Money {
    // Trial quantities per product, in first-seen order for determinism.
    let mut trial_qty_by_product: Vec<(&str, i64)> = Vec::new();
    for line in lines.iter().filter(|l| l.size == ProductSize::Trial) {
        match trial_qty_by_product
            .iter_mut()
            .find(|(id, _)| *id == line.product_id)
        {
            Some((_, qty)) => *qty += line.quantity,
            None => trial_qty_by_product.push((&line.product_id, line.quantity)),
        }
    }

    // Reference price: the first trial-size line in the overall line list.
    let reference_price = lines
        .iter()
        .find(|l| l.size == ProductSize::Trial)
        .map(|l| l.unit_price())
        .unwrap_or_else(Money::zero);

    let mut discount = Money::zero();
    for (_, qty) in trial_qty_by_product {
        if qty >= TRIAL_PROMO_GROUP {
            let free_units = qty / TRIAL_PROMO_GROUP;
            discount += reference_price.multiply_quantity(free_units);
        }
    }

    discount
}

// =============================================================================
// Shipping Threshold
// =============================================================================

/// Shipping surcharge for an order total.
///
/// Totals at or above $35.00 ship free; below that a flat $5.00 applies.
///
/// ## Example
/// ```rust
/// use spicehouse_core::money::Money;
/// use spicehouse_core::pricing::shipping_fee;
///
/// assert_eq!(shipping_fee(Money::from_cents(4000)).cents(), 0);
/// assert_eq!(shipping_fee(Money::from_cents(2000)).cents(), 500);
/// ```
pub fn shipping_fee(total: Money) -> Money {
    if total.cents() >= FREE_SHIPPING_THRESHOLD_CENTS {
        Money::zero()
    } else {
        Money::from_cents(SHIPPING_FEE_CENTS)
    }
}

/// Amount actually charged for an order: total plus shipping surcharge.
pub fn charged_total(total: Money) -> Money {
    total + shipping_fee(total)
}

// =============================================================================
// Unit Tests
// =============================================================================
