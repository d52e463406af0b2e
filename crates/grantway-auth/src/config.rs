//! Authorization engine configuration.
//!
//! Lifetimes are deserialized with `humantime_serde`, so TOML configuration
//! can use human-readable durations:
//!
//! ```toml
//! [grant]
//! issuer = "https://auth.example.com"
//! authorization_code_lifetime = "10m"
//! access_token_lifetime = "1h"
//! trusted_domains = ["app.example.com"]
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the authorization code grant engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GrantConfig {
    /// Issuer URL placed in token `iss` claims.
    /// This should be the public base URL of the authorization server.
    pub issuer: String,

    /// Authorization code lifetime.
    /// Codes are short-lived by design (minutes, not hours).
    #[serde(with = "humantime_serde")]
    pub authorization_code_lifetime: Duration,

    /// Access token lifetime.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// ID token lifetime.
    #[serde(with = "humantime_serde")]
    pub id_token_lifetime: Duration,

    /// Redirect URI hosts allowed to receive authorization codes.
    /// A host matches when it equals an entry or is a subdomain of one.
    pub trusted_domains: Vec<String>,
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            authorization_code_lifetime: Duration::from_secs(600), // 10 minutes
            access_token_lifetime: Duration::from_secs(3600),      // 1 hour
            id_token_lifetime: Duration::from_secs(3600),          // 1 hour
            trusted_domains: Vec::new(),
        }
    }
}

impl GrantConfig {
    /// Sets the issuer URL.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the authorization code lifetime.
    #[must_use]
    pub fn with_code_lifetime(mut self, lifetime: Duration) -> Self {
        self.authorization_code_lifetime = lifetime;
        self
    }

    /// Sets the access token lifetime.
    #[must_use]
    pub fn with_access_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.access_token_lifetime = lifetime;
        self
    }

    /// Sets the ID token lifetime.
    #[must_use]
    pub fn with_id_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.id_token_lifetime = lifetime;
        self
    }

    /// Adds a trusted redirect domain.
    #[must_use]
    pub fn with_trusted_domain(mut self, domain: impl Into<String>) -> Self {
        self.trusted_domains.push(domain.into());
        self
    }
}
