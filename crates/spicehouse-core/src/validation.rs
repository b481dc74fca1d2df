//! # Validation Module
//!
//! Boundary validation for the Spicehouse storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation shell                                           │
//! │  ├── Quantity steppers floor at 1                                      │
//! │  └── Required form fields                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (store / checkout boundary)                      │
//! │  ├── Quantity floor and ceiling, cart size                             │
//! │  └── Shipping address completeness                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: External backend                                             │
//! │  └── Full address/payment validation                                   │
//! │                                                                         │
//! │  Contract violations stop HERE - they never mutate state and never     │
//! │  surface as runtime failures deeper in.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::ShippingAddress;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (>= 1); zero and negative quantities are rejected
///   before any cart state mutates
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// Zero is allowed (promotional freebies); negative prices are not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines) before an append.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Shipping Address
// =============================================================================

/// Validates that a shipping address is complete enough to submit.
///
/// ## Rules
/// - `full_name`, `email`, `address_line1`, `city`, `state`,
///   `postal_code`, `country`, and `phone` must be non-blank
/// - `email` must look like an address (contains `@` with characters on
///   both sides); real deliverability is the backend's problem
/// - `address_line2` is optional
pub fn validate_shipping_address(address: &ShippingAddress) -> ValidationResult<()> {
    require_field("full name", &address.full_name)?;
    require_field("email", &address.email)?;
    require_field("address line 1", &address.address_line1)?;
    require_field("city", &address.city)?;
    require_field("state", &address.state)?;
    require_field("postal code", &address.postal_code)?;
    require_field("country", &address.country)?;
    require_field("phone", &address.phone)?;

    let email = address.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be an email address".to_string(),
        }),
    }
}

fn require_field(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
