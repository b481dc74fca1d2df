//! # spicehouse-checkout: The System Boundary
//!
//! Everything that leaves the machine lives here: the authentication
//! session, payment confirmation, the remote order backend, and the
//! checkout orchestrator that sequences them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Checkout (orchestrator module)                  │   │
//! │  │                                                                 │   │
//! │  │   CollectingShipping → CollectingPayment → Submitting           │   │
//! │  │                                     │                           │   │
//! │  │                        ┌────────────┼────────────┐              │   │
//! │  │                        ▼            ▼            ▼              │   │
//! │  │                   Succeeded      Failed     (no cancel once     │   │
//! │  │                                              submitting)        │   │
//! │  └───────┬───────────────────┬──────────────────────┬──────────────┘   │
//! │          │                   │                      │                  │
//! │          ▼                   ▼                      ▼                  │
//! │   ┌────────────┐      ┌────────────┐        ┌────────────┐            │
//! │   │  AuthApi   │      │ PaymentApi │        │  OrderApi  │            │
//! │   │ (sessions) │      │ (confirm)  │        │ (records)  │            │
//! │   └────────────┘      └────────────┘        └────────────┘            │
//! │          │                   │                      │                  │
//! │          ▼                   ▼                      ▼                  │
//! │    GoTrue-style        Stripe-style          PostgREST-style          │
//! │    REST backend        intent backend        REST backend             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - Authentication collaborator and session state
//! - [`payment`] - Payment confirmation collaborator
//! - [`orders`] - Remote order backend collaborator
//! - [`orchestrator`] - The checkout state machine and pipeline
//! - [`config`] - Endpoint and timeout configuration
//! - [`error`] - Checkout error types

pub mod auth;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod orders;
pub mod payment;

pub use auth::{AuthApi, AuthState, HttpAuthClient};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use orchestrator::{Checkout, CheckoutOutcome, CheckoutStage};
pub use orders::{HttpOrderClient, NewOrder, OrderApi};
pub use payment::{BillingDetails, HttpPaymentClient, PaymentApi, PaymentConfirmation};
