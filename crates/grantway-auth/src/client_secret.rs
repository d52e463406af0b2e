//! Client secret identities and verification.

use serde::{Deserialize, Serialize};

use crate::claims::Claim;

/// A registered client's secret identity.
///
/// Owned by the security repository and always looked up by client id,
/// never by secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecretIdentity {
    /// The client identifier.
    pub client_id: String,

    /// The client's registered secret.
    pub client_secret: String,

    /// Claims registered for the client itself.
    pub claims: Vec<Claim>,
}

impl ClientSecretIdentity {
    /// Creates a new client secret identity.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        claims: Vec<Claim>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            claims,
        }
    }

    /// Returns `true` if the registered secret is missing or blank.
    #[must_use]
    pub fn has_blank_secret(&self) -> bool {
        self.client_secret.trim().is_empty()
    }
}

/// Verifies a presented secret against the stored identity.
///
/// Comparison is ordinal: exact byte equality, case-sensitive, no
/// normalization. A blank stored secret never verifies.
#[must_use]
pub fn verify_client_secret(identity: &ClientSecretIdentity, presented: &str) -> bool {
    if identity.has_blank_secret() {
        return false;
    }
    identity.client_secret.as_bytes() == presented.as_bytes()
}
