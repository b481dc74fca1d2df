//! # Checkout Orchestrator
//!
//! The state machine that turns a cart into a placed order.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Pipeline                                 │
//! │                                                                         │
//! │  CollectingShipping ──submit_shipping()──► CollectingPayment            │
//! │                                                  │                      │
//! │                                           place_order()                 │
//! │                                                  ▼                      │
//! │                                             Submitting                  │
//! │                                                  │                      │
//! │   1. create_order (status: pending, charged total incl. shipping)       │
//! │   2. insert_order_items (frozen line snapshots)                         │
//! │   3. confirm_payment (charged total, billing from address)              │
//! │   4. update_order_status (completed, payment reference)                 │
//! │   5. cart.clear()                                                       │
//! │                                                  │                      │
//! │                         ┌────────────────────────┴──────────┐           │
//! │                         ▼                                   ▼           │
//! │                     Succeeded                            Failed         │
//! │                  (cart emptied)               (cart intact, order row   │
//! │                                                marked failed, message   │
//! │                                                is retryable)            │
//! │                                                                         │
//! │  Each step awaits the previous; there is no mid-flight cancellation    │
//! │  once Submitting begins.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Guarantees
//! - The cart is never cleared on a failed checkout.
//! - A created order never stays `Pending`: any later step failing marks
//!   it `Failed`. If even that marking call fails, the failure is logged
//!   and the pipeline still surfaces the original error.

use std::sync::Arc;

use tracing::{error, info, warn};

use spicehouse_core::{
    pricing, validation, Cart, CoreError, Money, OrderItem, OrderStatus, ShippingAddress, User,
};
use spicehouse_store::CartStore;

use crate::auth::AuthApi;
use crate::error::{CheckoutError, CheckoutResult};
use crate::orders::{NewOrder, OrderApi};
use crate::payment::{BillingDetails, PaymentApi};

// =============================================================================
// Checkout Stage
// =============================================================================

/// Where a checkout currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    /// Waiting for a complete shipping address.
    CollectingShipping,
    /// Address accepted; waiting for the shopper to confirm payment.
    CollectingPayment,
    /// The pipeline is running; no cancellation from here.
    Submitting,
    /// Order placed and paid; the cart has been emptied.
    Succeeded,
    /// A step failed; the cart is intact and the checkout may be retried.
    Failed,
}

// =============================================================================
// Checkout Outcome
// =============================================================================

/// What a successful checkout produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Backend-assigned order id.
    pub order_id: String,
    /// Payment processor reference for the charge.
    pub payment_reference: String,
    /// Amount actually charged, including any shipping surcharge.
    pub charged: Money,
}

// =============================================================================
// Checkout
// =============================================================================

/// One checkout attempt over the live cart.
///
/// Owns the stage, the collected address, and handles to the three
/// collaborators. Collaborators are trait objects so tests drive the
/// pipeline with in-memory fakes.
pub struct Checkout {
    cart: CartStore,
    auth: Arc<dyn AuthApi>,
    payment: Arc<dyn PaymentApi>,
    orders: Arc<dyn OrderApi>,
    stage: CheckoutStage,
    address: Option<ShippingAddress>,
}

impl Checkout {
    /// Starts a checkout at `CollectingShipping`.
    pub fn new(
        cart: CartStore,
        auth: Arc<dyn AuthApi>,
        payment: Arc<dyn PaymentApi>,
        orders: Arc<dyn OrderApi>,
    ) -> Self {
        Checkout {
            cart,
            auth,
            payment,
            orders,
            stage: CheckoutStage::CollectingShipping,
            address: None,
        }
    }

    /// The current stage.
    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// The collected shipping address, once submitted.
    pub fn shipping_address(&self) -> Option<&ShippingAddress> {
        self.address.as_ref()
    }

    /// Accepts the shipping address and advances to `CollectingPayment`.
    ///
    /// Field presence is validated here; deeper address validation is the
    /// backend's job. Resubmitting from `CollectingPayment` replaces the
    /// previous address (the shopper went back to edit).
    pub fn submit_shipping(&mut self, address: ShippingAddress) -> CheckoutResult<()> {
        match self.stage {
            CheckoutStage::CollectingShipping | CheckoutStage::CollectingPayment => {}
            _ => return Err(CheckoutError::WrongStage("submit_shipping")),
        }

        validation::validate_shipping_address(&address).map_err(CoreError::from)?;

        self.address = Some(address);
        self.stage = CheckoutStage::CollectingPayment;
        Ok(())
    }

    /// Walks away from the checkout. No side effects.
    ///
    /// Permitted any time before `Submitting`, and again after a failure
    /// (the shopper gives up on retrying). Not permitted mid-pipeline.
    pub fn abandon(&mut self) -> CheckoutResult<()> {
        match self.stage {
            CheckoutStage::Submitting => Err(CheckoutError::WrongStage("abandon")),
            CheckoutStage::Succeeded => Err(CheckoutError::WrongStage("abandon")),
            _ => {
                info!("Checkout abandoned");
                self.address = None;
                self.stage = CheckoutStage::CollectingShipping;
                Ok(())
            }
        }
    }

    /// Runs the order pipeline to a terminal stage.
    ///
    /// ## Entry Requirements
    /// - Stage is `CollectingPayment` (or `Failed`, for a retry)
    /// - A signed-in shopper
    /// - A non-empty cart
    ///
    /// ## Terminal Guarantees
    /// On success the cart is emptied and the outcome carries the order id
    /// and payment reference. On failure the cart is untouched, the order
    /// row (if created) is marked `Failed`, and the returned error is a
    /// retryable user-visible message.
    pub async fn place_order(&mut self) -> CheckoutResult<CheckoutOutcome> {
        match self.stage {
            CheckoutStage::CollectingPayment | CheckoutStage::Failed => {}
            _ => return Err(CheckoutError::WrongStage("place_order")),
        }

        let user = self
            .auth
            .current_user()
            .await
            .ok_or(CheckoutError::NotSignedIn)?;

        let cart = self.cart.snapshot().await;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let Some(address) = self.address.clone() else {
            return Err(CheckoutError::WrongStage("place_order"));
        };

        self.stage = CheckoutStage::Submitting;
        info!(
            user_id = %user.id,
            lines = cart.line_count(),
            total_cents = cart.totals.total_cents,
            "Submitting order"
        );

        match self.run_pipeline(&user, &cart, &address).await {
            Ok(outcome) => {
                self.stage = CheckoutStage::Succeeded;
                info!(order_id = %outcome.order_id, "Checkout succeeded");
                Ok(outcome)
            }
            Err(e) => {
                self.stage = CheckoutStage::Failed;
                warn!(error = %e, "Checkout failed; cart left intact");
                Err(e)
            }
        }
    }

    /// The sequential pipeline. Each step awaits the previous one.
    async fn run_pipeline(
        &self,
        user: &User,
        cart: &Cart,
        address: &ShippingAddress,
    ) -> CheckoutResult<CheckoutOutcome> {
        let total = cart.totals.total();
        let shipping = pricing::shipping_fee(total);
        let charged = pricing::charged_total(total);

        // Step 1: the order row, created pending for the charged amount.
        let order_id = self
            .orders
            .create_order(&NewOrder {
                user_id: user.id.clone(),
                status: OrderStatus::Pending,
                total_cents: charged.cents(),
                shipping_cents: shipping.cents(),
                shipping_address: address.clone(),
            })
            .await?;

        // From here the order row exists; a failure below must not leave
        // it pending.
        match self.finish_order(&order_id, cart, address, charged).await {
            Ok(payment_reference) => Ok(CheckoutOutcome {
                order_id,
                payment_reference,
                charged,
            }),
            Err(e) => {
                if let Err(mark_err) = self
                    .orders
                    .update_order_status(&order_id, OrderStatus::Failed, None)
                    .await
                {
                    error!(
                        order_id = %order_id,
                        error = %mark_err,
                        "Could not mark failed order; row may be left pending"
                    );
                }
                Err(e)
            }
        }
    }

    /// Steps 2-5: items, payment, completion, cart clear.
    async fn finish_order(
        &self,
        order_id: &str,
        cart: &Cart,
        address: &ShippingAddress,
        charged: Money,
    ) -> CheckoutResult<String> {
        // Step 2: frozen line snapshots.
        let items: Vec<OrderItem> = cart
            .lines
            .iter()
            .map(|line| OrderItem {
                order_id: order_id.to_string(),
                product_id: line.product_id.clone(),
                product_name: line.name.clone(),
                product_size: line.size,
                price_cents: line.unit_price_cents,
                quantity: line.quantity,
            })
            .collect();
        self.orders.insert_order_items(order_id, &items).await?;

        // Step 3: charge, with billing details taken from the address.
        let billing = BillingDetails {
            name: address.full_name.clone(),
            email: address.email.clone(),
            phone: address.phone.clone(),
        };
        let confirmation = self.payment.confirm_payment(charged, &billing).await?;

        // Step 4: the order is done.
        self.orders
            .update_order_status(
                order_id,
                OrderStatus::Completed,
                Some(&confirmation.payment_reference),
            )
            .await?;

        // Step 5: empty the cart. The order is paid and completed at this
        // point, so a local storage failure here is logged rather than
        // reported as a failed checkout.
        if let Err(e) = self.cart.clear().await {
            error!(order_id, error = %e, "Order completed but cart clear failed");
        }

        Ok(confirmation.payment_reference)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use spicehouse_core::{AuthSession, CartLine, ProductSize};
    use spicehouse_store::{Storage, StorageConfig};

    // --- fakes ---------------------------------------------------------------

    struct FakeAuth {
        user: Option<User>,
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn sign_in(&self, _: &str, _: &str) -> CheckoutResult<AuthSession> {
            unimplemented!("not used by the pipeline")
        }
        async fn sign_up(&self, _: &str, _: &str) -> CheckoutResult<AuthSession> {
            unimplemented!("not used by the pipeline")
        }
        async fn sign_in_with_otp(&self, _: &str) -> CheckoutResult<()> {
            unimplemented!("not used by the pipeline")
        }
        async fn verify_otp(&self, _: &str, _: &str) -> CheckoutResult<AuthSession> {
            unimplemented!("not used by the pipeline")
        }
        fn sign_in_with_provider(&self, provider: &str) -> String {
            format!("fake://{provider}")
        }
        async fn sign_out(&self) -> CheckoutResult<()> {
            Ok(())
        }
        async fn current_user(&self) -> Option<User> {
            self.user.clone()
        }
    }

    #[derive(Default)]
    struct RecordingOrders {
        // order_id -> (status, payment_reference)
        statuses: Mutex<HashMap<String, (OrderStatus, Option<String>)>>,
        created: Mutex<Vec<NewOrder>>,
        items: Mutex<Vec<OrderItem>>,
        fail_item_insert: bool,
    }

    impl RecordingOrders {
        fn status_of(&self, order_id: &str) -> Option<(OrderStatus, Option<String>)> {
            self.statuses.lock().unwrap().get(order_id).cloned()
        }
    }

    #[async_trait]
    impl OrderApi for RecordingOrders {
        async fn create_order(&self, order: &NewOrder) -> CheckoutResult<String> {
            let id = format!("ord_{}", self.created.lock().unwrap().len() + 1);
            self.created.lock().unwrap().push(order.clone());
            self.statuses
                .lock()
                .unwrap()
                .insert(id.clone(), (order.status, None));
            Ok(id)
        }

        async fn insert_order_items(
            &self,
            _order_id: &str,
            items: &[OrderItem],
        ) -> CheckoutResult<()> {
            if self.fail_item_insert {
                return Err(CheckoutError::OrderBackend("insert failed".into()));
            }
            self.items.lock().unwrap().extend_from_slice(items);
            Ok(())
        }

        async fn update_order_status(
            &self,
            order_id: &str,
            status: OrderStatus,
            payment_reference: Option<&str>,
        ) -> CheckoutResult<()> {
            self.statuses.lock().unwrap().insert(
                order_id.to_string(),
                (status, payment_reference.map(String::from)),
            );
            Ok(())
        }
    }

    struct FakePayment {
        decline: bool,
        charges: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl PaymentApi for FakePayment {
        async fn confirm_payment(
            &self,
            amount: Money,
            _billing: &BillingDetails,
        ) -> CheckoutResult<crate::payment::PaymentConfirmation> {
            self.charges.lock().unwrap().push(amount.cents());
            if self.decline {
                return Err(CheckoutError::PaymentDeclined("card declined".into()));
            }
            Ok(crate::payment::PaymentConfirmation {
                payment_reference: "pi_test".to_string(),
            })
        }
    }

    // --- helpers -------------------------------------------------------------

    fn user() -> User {
        User {
            id: "u1".to_string(),
            email: Some("priya@example.com".to_string()),
            phone: None,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Priya Subramanian".to_string(),
            email: "priya@example.com".to_string(),
            address_line1: "12 Temple Street".to_string(),
            address_line2: None,
            city: "Austin".to_string(),
            state: "TX".to_string(),
            postal_code: "78701".to_string(),
            country: "United States".to_string(),
            phone: "+1 512 555 0182".to_string(),
        }
    }

    fn trial_line(product_id: &str, price: i64, quantity: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            name: product_id.to_string(),
            unit_price_cents: price,
            image: String::new(),
            size: ProductSize::Trial,
            quantity,
        }
    }

    async fn cart_with(lines: Vec<CartLine>) -> CartStore {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let store = CartStore::open(&storage).await.unwrap();
        for line in lines {
            store.add_line(line).await.unwrap();
        }
        store
    }

    struct Harness {
        checkout: Checkout,
        orders: Arc<RecordingOrders>,
        payment: Arc<FakePayment>,
        cart: CartStore,
    }

    async fn harness(lines: Vec<CartLine>, signed_in: bool, decline: bool) -> Harness {
        let cart = cart_with(lines).await;
        let orders = Arc::new(RecordingOrders::default());
        let payment = Arc::new(FakePayment {
            decline,
            charges: Mutex::new(Vec::new()),
        });
        let auth = Arc::new(FakeAuth {
            user: signed_in.then(user),
        });

        let checkout = Checkout::new(
            cart.clone(),
            auth,
            payment.clone(),
            orders.clone(),
        );

        Harness {
            checkout,
            orders,
            payment,
            cart,
        }
    }

    // --- tests ---------------------------------------------------------------

    #[tokio::test]
    async fn test_shipping_surcharge_below_threshold() {
        // 6 trial units at $5: subtotal $30, discount $10, total $20.
        let mut h = harness(vec![trial_line("rasam-powder", 500, 6)], true, false).await;

        h.checkout.submit_shipping(address()).unwrap();
        let outcome = h.checkout.place_order().await.unwrap();

        // $20 total ships for $5; charge is $25.
        assert_eq!(outcome.charged.cents(), 2500);
        assert_eq!(h.payment.charges.lock().unwrap().as_slice(), &[2500]);

        let created = h.orders.created.lock().unwrap();
        assert_eq!(created[0].total_cents, 2500);
        assert_eq!(created[0].shipping_cents, 500);
    }

    #[tokio::test]
    async fn test_free_shipping_at_threshold() {
        // 12 trial units at $5: subtotal $60, discount $20, total $40.
        let mut h = harness(vec![trial_line("rasam-powder", 500, 12)], true, false).await;

        h.checkout.submit_shipping(address()).unwrap();
        let outcome = h.checkout.place_order().await.unwrap();

        assert_eq!(outcome.charged.cents(), 4000);
        let created = h.orders.created.lock().unwrap();
        assert_eq!(created[0].shipping_cents, 0);
    }

    #[tokio::test]
    async fn test_successful_checkout_completes_order_and_clears_cart() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 2)], true, false).await;

        h.checkout.submit_shipping(address()).unwrap();
        let outcome = h.checkout.place_order().await.unwrap();

        assert_eq!(h.checkout.stage(), CheckoutStage::Succeeded);
        assert_eq!(
            h.orders.status_of(&outcome.order_id),
            Some((OrderStatus::Completed, Some("pi_test".to_string())))
        );
        assert!(h.cart.is_empty().await);

        // Items were frozen from the cart lines.
        let items = h.orders.items.lock().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, "rasam-powder");
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_declined_payment_fails_order_and_keeps_cart() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 2)], true, true).await;

        h.checkout.submit_shipping(address()).unwrap();
        let err = h.checkout.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentDeclined(_)));
        assert!(err.is_retryable());
        assert_eq!(h.checkout.stage(), CheckoutStage::Failed);

        // The order row is terminal Failed, never Completed or Pending.
        assert_eq!(
            h.orders.status_of("ord_1"),
            Some((OrderStatus::Failed, None))
        );
        assert!(!h.cart.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_item_insert_marks_order_failed() {
        let cart = cart_with(vec![trial_line("rasam-powder", 500, 1)]).await;
        let orders = Arc::new(RecordingOrders {
            fail_item_insert: true,
            ..RecordingOrders::default()
        });
        let payment = Arc::new(FakePayment {
            decline: false,
            charges: Mutex::new(Vec::new()),
        });
        let auth = Arc::new(FakeAuth { user: Some(user()) });

        let mut checkout = Checkout::new(cart.clone(), auth, payment.clone(), orders.clone());
        checkout.submit_shipping(address()).unwrap();

        let err = checkout.place_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::OrderBackend(_)));
        assert_eq!(orders.status_of("ord_1"), Some((OrderStatus::Failed, None)));

        // Payment was never attempted.
        assert!(payment.charges.lock().unwrap().is_empty());
        assert!(!cart.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_checkout_can_be_retried() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 2)], true, true).await;

        h.checkout.submit_shipping(address()).unwrap();
        assert!(h.checkout.place_order().await.is_err());
        assert_eq!(h.checkout.stage(), CheckoutStage::Failed);

        // Retry is allowed from Failed without resubmitting the address.
        // (The fake still declines; the point is the stage transition.)
        assert!(h.checkout.place_order().await.is_err());
        assert_eq!(h.payment.charges.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_place_order_requires_signed_in_user() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 1)], false, false).await;

        h.checkout.submit_shipping(address()).unwrap();
        let err = h.checkout.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::NotSignedIn));
        assert!(h.orders.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_cart() {
        let mut h = harness(vec![], true, false).await;

        h.checkout.submit_shipping(address()).unwrap();
        let err = h.checkout.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_incomplete_address_is_rejected() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 1)], true, false).await;

        let mut addr = address();
        addr.postal_code = String::new();

        let err = h.checkout.submit_shipping(addr).unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(_)));
        assert_eq!(h.checkout.stage(), CheckoutStage::CollectingShipping);
    }

    #[tokio::test]
    async fn test_place_order_requires_submitted_address() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 1)], true, false).await;

        let err = h.checkout.place_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::WrongStage(_)));
    }

    #[tokio::test]
    async fn test_abandon_before_submitting_resets() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 1)], true, false).await;

        h.checkout.submit_shipping(address()).unwrap();
        assert_eq!(h.checkout.stage(), CheckoutStage::CollectingPayment);

        h.checkout.abandon().unwrap();
        assert_eq!(h.checkout.stage(), CheckoutStage::CollectingShipping);
        assert!(h.checkout.shipping_address().is_none());

        // Abandoning never touches the cart.
        assert!(!h.cart.is_empty().await);
    }

    #[tokio::test]
    async fn test_abandon_after_success_is_rejected() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 1)], true, false).await;

        h.checkout.submit_shipping(address()).unwrap();
        h.checkout.place_order().await.unwrap();

        assert!(h.checkout.abandon().is_err());
    }

    #[tokio::test]
    async fn test_resubmitting_shipping_replaces_address() {
        let mut h = harness(vec![trial_line("rasam-powder", 500, 1)], true, false).await;

        h.checkout.submit_shipping(address()).unwrap();

        let mut edited = address();
        edited.city = "Houston".to_string();
        h.checkout.submit_shipping(edited).unwrap();

        assert_eq!(
            h.checkout.shipping_address().map(|a| a.city.as_str()),
            Some("Houston")
        );
        assert_eq!(h.checkout.stage(), CheckoutStage::CollectingPayment);
    }
}
