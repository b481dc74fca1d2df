//! # Authentication Collaborator
//!
//! The shopper's session against an external GoTrue-style auth backend.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Auth Session Lifecycle                            │
//! │                                                                         │
//! │  Client created ──► AuthState::Loading                                  │
//! │        │                                                                │
//! │        ▼  restore_session() / sign_in() / verify_otp()                  │
//! │  ┌───────────────┐         ┌───────────────────┐                        │
//! │  │   SignedOut   │ ◄─────► │  SignedIn(User)   │                        │
//! │  └───────────────┘ sign_out└───────────────────┘                        │
//! │                                                                         │
//! │  Consumers gate on `is_loading()` before trusting `SignedOut`: a        │
//! │  restore still in flight is not the same as no session.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Non-goals
//! The provider's own surfaces (sign-in forms, OTP delivery, OAuth redirect
//! handling) stay external. `sign_in_with_provider` only builds the
//! redirect URL; following it is the shell's job.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use spicehouse_core::{AuthSession, User};

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Auth State
// =============================================================================

/// The consumer-visible session state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Session restore is still in flight; don't trust `SignedOut` yet.
    Loading,
    /// No active session.
    SignedOut,
    /// An active session for this shopper.
    SignedIn(User),
}

impl AuthState {
    /// Whether the session is still being restored.
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    /// Whether a shopper is signed in.
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }

    /// The signed-in shopper, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

// =============================================================================
// Collaborator Trait
// =============================================================================

/// The authentication collaborator seam.
///
/// The HTTP implementation talks to the real backend; tests swap in a
/// fake that answers from memory.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> CheckoutResult<AuthSession>;

    /// Registers a new account with email and password.
    async fn sign_up(&self, email: &str, password: &str) -> CheckoutResult<AuthSession>;

    /// Requests a one-time code be sent to the given phone number.
    async fn sign_in_with_otp(&self, phone: &str) -> CheckoutResult<()>;

    /// Exchanges a received one-time code for a session.
    async fn verify_otp(&self, phone: &str, token: &str) -> CheckoutResult<AuthSession>;

    /// Builds the OAuth redirect URL for an external provider.
    /// Following the redirect is the presentation shell's job.
    fn sign_in_with_provider(&self, provider: &str) -> String;

    /// Ends the current session.
    async fn sign_out(&self) -> CheckoutResult<()>;

    /// The currently signed-in shopper, if any.
    async fn current_user(&self) -> Option<User>;
}

// =============================================================================
// Wire Types
// =============================================================================

/// Token response from the auth backend.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: Option<String>,
    phone: Option<String>,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        User {
            id: wire.id,
            email: wire.email,
            phone: wire.phone,
        }
    }
}

/// Error body the auth backend returns on 4xx.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(alias = "error_description", alias = "msg")]
    message: Option<String>,
}

// =============================================================================
// HTTP Client
// =============================================================================

/// Auth collaborator backed by a GoTrue-style REST surface.
pub struct HttpAuthClient {
    config: CheckoutConfig,
    client: reqwest::Client,
    state: Arc<RwLock<AuthState>>,
}

impl HttpAuthClient {
    /// Creates a new auth client. The session starts `Loading` until the
    /// first sign-in, restore, or sign-out settles it.
    pub fn new(config: CheckoutConfig) -> CheckoutResult<Self> {
        let client = config.http_client()?;
        Ok(HttpAuthClient {
            config,
            client,
            state: Arc::new(RwLock::new(AuthState::Loading)),
        })
    }

    /// Restores a session from a previously issued access token.
    ///
    /// A rejected or expired token settles the state to `SignedOut`
    /// rather than failing; the shopper just signs in again.
    pub async fn restore_session(&self, access_token: &str) -> CheckoutResult<AuthState> {
        let response = self
            .client
            .get(format!("{}/user", self.config.auth_url))
            .bearer_auth(access_token)
            .header("apikey", &self.config.api_key)
            .send()
            .await?;

        let state = if response.status().is_success() {
            let user: WireUser = response.json().await?;
            info!(user_id = %user.id, "Session restored");
            AuthState::SignedIn(user.into())
        } else {
            debug!(status = %response.status(), "No restorable session");
            AuthState::SignedOut
        };

        *self.state.write().await = state.clone();
        Ok(state)
    }

    /// The current consumer-visible session state.
    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    async fn token_request(&self, path: &str, body: serde_json::Value) -> CheckoutResult<AuthSession> {
        let response = self
            .client
            .post(format!("{}{}", self.config.auth_url, path))
            .header("apikey", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<AuthErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            warn!(%status, "Auth backend rejected request");
            return Err(CheckoutError::Auth(message));
        }

        let token: TokenResponse = response.json().await?;
        let session = AuthSession {
            user: token.user.into(),
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        };

        *self.state.write().await = AuthState::SignedIn(session.user.clone());
        Ok(session)
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> CheckoutResult<AuthSession> {
        info!(email, "Signing in with password");
        self.token_request(
            "/token?grant_type=password",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> CheckoutResult<AuthSession> {
        info!(email, "Registering new account");
        self.token_request("/signup", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_in_with_otp(&self, phone: &str) -> CheckoutResult<()> {
        info!(phone, "Requesting one-time code");

        let response = self
            .client
            .post(format!("{}/otp", self.config.auth_url))
            .header("apikey", &self.config.api_key)
            .json(&json!({ "phone": phone }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CheckoutError::Auth(format!(
                "Could not send code: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn verify_otp(&self, phone: &str, token: &str) -> CheckoutResult<AuthSession> {
        info!(phone, "Verifying one-time code");
        self.token_request(
            "/verify",
            json!({ "type": "sms", "phone": phone, "token": token }),
        )
        .await
    }

    fn sign_in_with_provider(&self, provider: &str) -> String {
        format!(
            "{}/authorize?provider={}",
            self.config.auth_url, provider
        )
    }

    async fn sign_out(&self) -> CheckoutResult<()> {
        info!("Signing out");

        // Best-effort revocation; the local session ends regardless.
        let result = self
            .client
            .post(format!("{}/logout", self.config.auth_url))
            .header("apikey", &self.config.api_key)
            .send()
            .await;

        if let Err(e) = result {
            warn!(error = %e, "Sign-out revocation call failed");
        }

        *self.state.write().await = AuthState::SignedOut;
        Ok(())
    }

    async fn current_user(&self) -> Option<User> {
        self.state.read().await.user().cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
