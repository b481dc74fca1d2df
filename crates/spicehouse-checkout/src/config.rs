//! # Checkout Configuration
//!
//! Endpoint and timeout configuration for the external collaborators.

use std::time::Duration;

/// Configuration for the checkout collaborators.
///
/// All three HTTP clients share one config so a presentation shell can
/// wire the backend once.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Base URL of the auth backend (GoTrue-style REST surface).
    pub auth_url: String,

    /// Base URL of the order backend (PostgREST-style REST surface).
    pub orders_url: String,

    /// Base URL of the payment processor (intent-style REST surface).
    pub payment_url: String,

    /// Project API key sent with every backend request.
    pub api_key: String,

    /// Publishable key for the payment processor.
    pub payment_key: String,

    /// Connection timeout for collaborator requests.
    pub connect_timeout: Duration,

    /// Overall request timeout for collaborator requests.
    pub request_timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://localhost:9999".to_string(),
            orders_url: "http://localhost:3000".to_string(),
            payment_url: "https://api.stripe.example".to_string(),
            api_key: String::new(),
            payment_key: String::new(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CheckoutConfig {
    /// Builds the shared HTTP client with the configured timeouts.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CheckoutConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.api_key.is_empty());
    }
}
