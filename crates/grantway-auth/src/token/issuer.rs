//! Access and ID token issuance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::claims::{ClaimsIdentity, NAME_IDENTIFIER_CLAIM_TYPE};
use crate::config::GrantConfig;
use crate::error::AuthError;
use crate::token::signer::TokenSigner;

/// A signed token with its expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// The compact signed token string.
    pub value: String,

    /// When the token stops being valid.
    #[serde(with = "time::serde::rfc3339")]
    pub expires: OffsetDateTime,
}

/// Issues bearer and ID tokens from an authenticated identity.
pub struct TokenIssuer {
    signer: Arc<dyn TokenSigner>,
    config: GrantConfig,
}

impl TokenIssuer {
    /// Creates a new issuer.
    #[must_use]
    pub fn new(signer: Arc<dyn TokenSigner>, config: GrantConfig) -> Self {
        Self { signer, config }
    }

    /// Issues a bearer access token carrying the identity's claims.
    ///
    /// Every claim in the identity is flattened into the payload under its
    /// claim type, alongside the standard `iss`, `sub`, `jti`, `iat` and
    /// `exp` entries. The subject is the identity's name identifier when
    /// one is present.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload cannot be signed.
    pub fn generate_token(&self, identity: &ClaimsIdentity) -> AuthResult<IssuedToken> {
        let now = OffsetDateTime::now_utc();
        let expires = now + self.config.access_token_lifetime;

        let mut payload = serde_json::Map::new();
        for claim in identity.claims() {
            payload.insert(
                claim.claim_type.clone(),
                serde_json::Value::String(claim.value.clone()),
            );
        }
        payload.insert("iss".to_string(), self.config.issuer.clone().into());
        if let Some(subject) = identity.name_identifier() {
            payload.insert("sub".to_string(), subject.to_string().into());
        }
        payload.insert("jti".to_string(), Uuid::new_v4().to_string().into());
        payload.insert("iat".to_string(), now.unix_timestamp().into());
        payload.insert("exp".to_string(), expires.unix_timestamp().into());

        let value = self.signer.sign(&serde_json::Value::Object(payload))?;
        Ok(IssuedToken { value, expires })
    }

    /// Issues an ID token for the identity.
    ///
    /// The subject is a one-way SHA-512 digest of the name identifier, so
    /// the raw identifier never appears in the token. The caller-supplied
    /// nonce, when present, is embedded for replay binding.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingClaim`] when the identity has no name
    /// identifier claim. That is an integration defect, not an
    /// attacker-controlled outcome, so it is loud.
    pub fn generate_id_token(
        &self,
        identity: &ClaimsIdentity,
        nonce: Option<&str>,
    ) -> AuthResult<IssuedToken> {
        let Some(subject) = identity.name_identifier() else {
            return Err(AuthError::missing_claim(NAME_IDENTIFIER_CLAIM_TYPE));
        };

        let now = OffsetDateTime::now_utc();
        let expires = now + self.config.id_token_lifetime;

        let mut payload = serde_json::Map::new();
        payload.insert("iss".to_string(), self.config.issuer.clone().into());
        payload.insert("sub".to_string(), hash_subject(subject).into());
        payload.insert("auth_time".to_string(), now.unix_timestamp().into());
        payload.insert("iat".to_string(), now.unix_timestamp().into());
        payload.insert("exp".to_string(), expires.unix_timestamp().into());
        if let Some(nonce) = nonce {
            payload.insert("nonce".to_string(), nonce.to_string().into());
        }

        let value = self.signer.sign(&serde_json::Value::Object(payload))?;
        Ok(IssuedToken { value, expires })
    }
}

/// One-way hash of the subject identifier, hex encoded.
fn hash_subject(identifier: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(identifier.as_bytes());
    hex::encode(hasher.finalize())
}
