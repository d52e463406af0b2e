//! Pending authorization state.
//!
//! The [`AuthorizationState`] is the value object that survives the
//! redirect round-trip. It never crosses the wire in plaintext: the engine
//! serializes it and passes the result through the caller-supplied
//! [`Protector`](crate::protect::Protector) before handing it out, and only
//! accepts it back through the matching
//! [`Unprotector`](crate::protect::Unprotector).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::AuthResult;
use crate::error::AuthError;
use crate::protect::{Protector, Unprotector};

/// State of a pending authorization, round-tripped through the redirect.
///
/// Immutable once built; derive a modified copy through [`Self::to_builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationState {
    /// Client identifier that initiated the request.
    pub client_id: String,

    /// Absolute redirect URI from the authorization request.
    pub redirect_uri: Url,

    /// Response type (always `code` for this engine).
    pub response_type: String,

    /// Requested scopes, in request order.
    pub scopes: Vec<String>,

    /// OpenID Connect nonce for ID token binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Opaque state supplied by the client, echoed back unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_state: Option<String>,

    /// Authorization code, populated once issuance succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AuthorizationState {
    /// Creates a builder for a new authorization state.
    #[must_use]
    pub fn builder(
        client_id: impl Into<String>,
        redirect_uri: Url,
        response_type: impl Into<String>,
    ) -> AuthorizationStateBuilder {
        AuthorizationStateBuilder {
            client_id: client_id.into(),
            redirect_uri,
            response_type: response_type.into(),
            scopes: Vec::new(),
            nonce: None,
            external_state: None,
            code: None,
        }
    }

    /// Derives a builder populated from this state.
    ///
    /// Used to produce a copy carrying the issued code without mutating the
    /// original.
    #[must_use]
    pub fn to_builder(&self) -> AuthorizationStateBuilder {
        AuthorizationStateBuilder {
            client_id: self.client_id.clone(),
            redirect_uri: self.redirect_uri.clone(),
            response_type: self.response_type.clone(),
            scopes: self.scopes.clone(),
            nonce: self.nonce.clone(),
            external_state: self.external_state.clone(),
            code: self.code.clone(),
        }
    }

    /// Serializes this state into an opaque string via the protector.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the protector fails.
    pub fn to_protected(&self, protector: &dyn Protector) -> AuthResult<String> {
        let json = serde_json::to_string(self)
            .map_err(|e| AuthError::internal(format!("Failed to serialize state: {e}")))?;
        protector.protect(&URL_SAFE_NO_PAD.encode(json))
    }

    /// Rebuilds a state from an opaque string via the unprotector.
    ///
    /// # Errors
    ///
    /// Returns an error if the unprotector rejects the value or the payload
    /// does not decode to a valid state.
    pub fn from_protected(value: &str, unprotector: &dyn Unprotector) -> AuthResult<Self> {
        let encoded = unprotector.unprotect(value)?;
        let json = URL_SAFE_NO_PAD
            .decode(encoded.as_bytes())
            .map_err(|e| AuthError::protection(format!("Invalid state payload: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| AuthError::protection(format!("Invalid state payload: {e}")))
    }
}

/// Builder for [`AuthorizationState`].
#[derive(Debug, Clone)]
pub struct AuthorizationStateBuilder {
    client_id: String,
    redirect_uri: Url,
    response_type: String,
    scopes: Vec<String>,
    nonce: Option<String>,
    external_state: Option<String>,
    code: Option<String>,
}

impl AuthorizationStateBuilder {
    /// Sets the requested scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the nonce.
    #[must_use]
    pub fn with_nonce(mut self, nonce: Option<String>) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the opaque client-supplied state.
    #[must_use]
    pub fn with_external_state(mut self, external_state: Option<String>) -> Self {
        self.external_state = external_state;
        self
    }

    /// Sets the issued authorization code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Builds the authorization state.
    #[must_use]
    pub fn build(self) -> AuthorizationState {
        AuthorizationState {
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            response_type: self.response_type,
            scopes: self.scopes,
            nonce: self.nonce,
            external_state: self.external_state,
            code: self.code,
        }
    }
}
