//! Signing backend for issued tokens.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use crate::AuthResult;
use crate::error::AuthError;

/// Signs a finished claims payload into a compact token string.
///
/// The issuer builds the payload; the signer owns the key material and the
/// wire format. Swapping the backend (different algorithm, remote signing
/// service) never touches the issuance logic.
pub trait TokenSigner: Send + Sync {
    /// Signs the payload.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] when the payload cannot be signed.
    fn sign(&self, payload: &serde_json::Value) -> AuthResult<String>;
}

/// JWT signer backed by a symmetric HS256 key.
pub struct JwtTokenSigner {
    header: Header,
    encoding_key: EncodingKey,
}

impl JwtTokenSigner {
    /// Creates an HS256 signer from a shared secret.
    #[must_use]
    pub fn hs256(secret: &[u8]) -> Self {
        Self {
            header: Header::new(Algorithm::HS256),
            encoding_key: EncodingKey::from_secret(secret),
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, payload: &serde_json::Value) -> AuthResult<String> {
        encode(&self.header, payload, &self.encoding_key)
            .map_err(|e| AuthError::signing(e.to_string()))
    }
}
