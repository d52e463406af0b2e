//! Trusted redirect domain resolution.
//!
//! Redirect URIs must land on an allow-listed domain before an
//! authorization code can be released to them; an open redirect would leak
//! codes to an attacker-controlled host.

use async_trait::async_trait;
use url::Url;

use crate::AuthResult;

/// Checks whether a redirect URI belongs to an allow-listed domain.
#[async_trait]
pub trait TrustedDomainResolver: Send + Sync {
    /// Returns `true` if the URI's host is trusted.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolver's backing source fails.
    async fn is_trusted_domain(&self, uri: &Url) -> AuthResult<bool>;
}

/// Resolver backed by a static allow-list of domains.
///
/// A host is trusted when it equals an entry exactly or is a subdomain of
/// one. Matching is case-insensitive per DNS semantics.
#[derive(Debug, Clone, Default)]
pub struct StaticTrustedDomainResolver {
    domains: Vec<String>,
}

impl StaticTrustedDomainResolver {
    /// Creates a resolver from an allow-list of domains.
    #[must_use]
    pub fn new(domains: Vec<String>) -> Self {
        Self {
            domains: domains.into_iter().map(|d| d.to_ascii_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl TrustedDomainResolver for StaticTrustedDomainResolver {
    async fn is_trusted_domain(&self, uri: &Url) -> AuthResult<bool> {
        let Some(host) = uri.host_str() else {
            return Ok(false);
        };
        let host = host.to_ascii_lowercase();
        Ok(self.domains.iter().any(|domain| {
            host == *domain || host.ends_with(&format!(".{domain}"))
        }))
    }
}
