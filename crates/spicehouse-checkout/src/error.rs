//! # Checkout Error Types
//!
//! Error types for the external collaborators and the checkout pipeline.
//!
//! Every variant maps to a user-visible, retryable message: a failed
//! checkout is a recoverable state (the cart is intact), never a crash.

use thiserror::Error;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Errors from the checkout pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires a signed-in user.
    #[error("You must be signed in to place an order")]
    NotSignedIn,

    /// Checkout requires a non-empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A pipeline step was invoked from the wrong stage.
    #[error("Checkout is not at the right step for this action: {0}")]
    WrongStage(&'static str),

    /// Input failed boundary validation (incomplete address, bad quantity).
    #[error(transparent)]
    Invalid(#[from] spicehouse_core::CoreError),

    /// The authentication backend rejected the request.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The payment processor declined the charge.
    #[error("Payment was declined: {0}")]
    PaymentDeclined(String),

    /// The payment processor failed for a non-decline reason.
    #[error("Payment failed: {0}")]
    Payment(String),

    /// The remote order backend rejected or failed a request.
    #[error("Order backend error: {0}")]
    OrderBackend(String),

    /// HTTP transport failure reaching any collaborator.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The local cart store failed during checkout.
    #[error(transparent)]
    Store(#[from] spicehouse_store::StoreError),
}

impl CheckoutError {
    /// Whether retrying the same action can reasonably succeed.
    ///
    /// Contract violations (not signed in, empty cart, bad input) need a
    /// different action from the shopper first; everything that crossed
    /// the network is worth retrying.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            CheckoutError::NotSignedIn
                | CheckoutError::EmptyCart
                | CheckoutError::WrongStage(_)
                | CheckoutError::Invalid(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        assert!(!CheckoutError::EmptyCart.is_retryable());
        assert!(!CheckoutError::NotSignedIn.is_retryable());
        assert!(CheckoutError::PaymentDeclined("card declined".into()).is_retryable());
        assert!(CheckoutError::OrderBackend("500".into()).is_retryable());
    }

    #[test]
    fn test_user_visible_messages() {
        assert_eq!(
            CheckoutError::EmptyCart.to_string(),
            "Your cart is empty"
        );
        assert_eq!(
            CheckoutError::PaymentDeclined("insufficient funds".into()).to_string(),
            "Payment was declined: insufficient funds"
        );
    }
}
