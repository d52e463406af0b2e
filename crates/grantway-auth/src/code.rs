//! Authorization codes and their stored payload.
//!
//! # Security
//!
//! - Code values are 256 bits of CSPRNG output, base64url-encoded.
//! - Codes are short-lived and single-use; the store removes the entry on
//!   retrieval.
//! - Code values are never logged.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

use crate::claims::Claim;

/// A one-time-use authorization code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationCode {
    /// The opaque, unguessable code value.
    pub value: String,

    /// Absolute expiry of the code.
    #[serde(with = "time::serde::rfc3339")]
    pub expires: OffsetDateTime,
}

impl AuthorizationCode {
    /// Generates a new cryptographically secure code value.
    ///
    /// 32 bytes of random data, base64url-encoded without padding
    /// (43 characters, 256 bits of entropy).
    #[must_use]
    pub fn generate_value() -> String {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Returns `true` if the code has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires
    }
}

/// The client-identifying data bound to an authorization code.
///
/// Every field must match the redemption request before a code can be
/// exchanged for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationData {
    /// Client identifier the code was issued to.
    pub client_id: String,

    /// The client's registered secret at issuance time.
    pub client_secret: String,

    /// The redirect URI the code was issued for.
    pub redirect_uri: Url,
}

impl AuthorizationData {
    /// Returns `true` if any required entry is missing or blank.
    #[must_use]
    pub fn has_blank_entries(&self) -> bool {
        self.client_id.trim().is_empty()
            || self.client_secret.trim().is_empty()
            || !self.redirect_uri.has_host()
    }
}

/// The key-value payload stored under an authorization code value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAuthorization {
    /// The scope-filtered claims selected at issuance.
    pub claims: Vec<Claim>,

    /// The client-identifying data bound to the code.
    pub data: AuthorizationData,

    /// Absolute expiry of the code.
    #[serde(with = "time::serde::rfc3339")]
    pub expires: OffsetDateTime,
}

impl StoredAuthorization {
    /// Returns `true` if the code payload has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires
    }
}
