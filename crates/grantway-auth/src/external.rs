//! External provider tokens embedded as protected claims.
//!
//! After a federated sign-in, the provider's OAuth response arrives as
//! untyped session items. [`ExternalTokenClaimCreator`] turns those items
//! into a single claim: the token is serialized, run through the injected
//! protector, and carried as the claim's value. The claim's value type
//! records which token shape the payload holds, so a later consumer knows
//! how to deserialize after unprotecting.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::claims::Claim;
use crate::error::AuthError;
use crate::protect::Protector;
use crate::session::{
    ACCESS_TOKEN_KEY, AuthenticationSessionItems, ExternalTokenClaimType, REFRESH_TOKEN_KEY,
    TOKEN_TYPE_KEY, has_access_token, has_refresh_token, has_token_type,
    resolve_expires, resolve_external_token_claim_type,
};

/// Wire value-type for a plain token payload.
pub const TOKEN_VALUE_TYPE: &str = "grantway.security.Token";

/// Wire value-type for a refreshable token payload.
pub const REFRESHABLE_TOKEN_VALUE_TYPE: &str = "grantway.security.RefreshableToken";

/// A third-party OAuth token captured from a provider response.
///
/// The variant discriminator doubles as the claim value-type string on the
/// wire, so consumers can deserialize without inspecting the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "valueType")]
pub enum ExternalToken {
    /// A bearer token with an optional expiry.
    #[serde(rename = "grantway.security.Token")]
    #[serde(rename_all = "camelCase")]
    Token {
        /// The raw token string.
        value: String,

        /// Expiry, when the provider reported one.
        #[serde(
            with = "time::serde::rfc3339::option",
            skip_serializing_if = "Option::is_none",
            default
        )]
        expires: Option<OffsetDateTime>,
    },

    /// A bearer token accompanied by a refresh token.
    #[serde(rename = "grantway.security.RefreshableToken")]
    #[serde(rename_all = "camelCase")]
    RefreshableToken {
        /// The raw token string.
        value: String,

        /// Expiry, when the provider reported one.
        #[serde(
            with = "time::serde::rfc3339::option",
            skip_serializing_if = "Option::is_none",
            default
        )]
        expires: Option<OffsetDateTime>,

        /// The token's declared type, usually `Bearer`.
        token_type: String,

        /// Token used to renew the access token without re-authentication.
        refresh_token: String,
    },
}

impl ExternalToken {
    /// The wire value-type string for this token shape.
    #[must_use]
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Token { .. } => TOKEN_VALUE_TYPE,
            Self::RefreshableToken { .. } => REFRESHABLE_TOKEN_VALUE_TYPE,
        }
    }
}

/// Whether a provider's session items contain enough to build its token.
///
/// Google responses carry a bare access token; Microsoft responses carry a
/// refreshable token and must also include the refresh token and token
/// type.
fn can_build_token(claim_type: ExternalTokenClaimType, items: &AuthenticationSessionItems) -> bool {
    match claim_type {
        ExternalTokenClaimType::Google => has_access_token(items),
        ExternalTokenClaimType::Microsoft => {
            has_access_token(items) && has_refresh_token(items) && has_token_type(items)
        }
    }
}

/// Builds the provider's token from its session items.
///
/// Returns `None` when a required item is missing, mirroring
/// [`can_build_token`].
fn build_token(
    claim_type: ExternalTokenClaimType,
    items: &AuthenticationSessionItems,
) -> Option<ExternalToken> {
    if !can_build_token(claim_type, items) {
        return None;
    }

    let value = items.get(ACCESS_TOKEN_KEY)?.clone();
    let expires = resolve_expires(items);

    match claim_type {
        ExternalTokenClaimType::Google => Some(ExternalToken::Token { value, expires }),
        ExternalTokenClaimType::Microsoft => Some(ExternalToken::RefreshableToken {
            value,
            expires,
            token_type: items.get(TOKEN_TYPE_KEY)?.clone(),
            refresh_token: items.get(REFRESH_TOKEN_KEY)?.clone(),
        }),
    }
}

/// Wraps an external provider token as a single protected claim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalTokenClaimCreator;

impl ExternalTokenClaimCreator {
    /// Creates a new creator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether a protected claim can be built from the session items.
    ///
    /// True only when the items name a recognized provider claim type and
    /// that provider's token shape is fully present.
    #[must_use]
    pub fn can_build(&self, items: &AuthenticationSessionItems) -> bool {
        match resolve_external_token_claim_type(items) {
            Some(claim_type) => can_build_token(claim_type, items),
            None => false,
        }
    }

    /// Builds the protected claim, or `None` when [`can_build`] would be
    /// false.
    ///
    /// The claim type is the provider's claim type, the value is the
    /// protected serialized token, and the value type is the token shape
    /// discriminator.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the protector fails. Those
    /// are infrastructure faults, not protocol outcomes.
    ///
    /// [`can_build`]: Self::can_build
    pub fn build(
        &self,
        items: &AuthenticationSessionItems,
        protector: &dyn Protector,
    ) -> AuthResult<Option<Claim>> {
        let Some(claim_type) = resolve_external_token_claim_type(items) else {
            return Ok(None);
        };
        let Some(token) = build_token(claim_type, items) else {
            return Ok(None);
        };

        let serialized =
            serde_json::to_string(&token).map_err(|e| AuthError::internal(e.to_string()))?;
        let protected = protector.protect(&serialized)?;

        Ok(Some(Claim::with_value_type(
            claim_type.as_str(),
            protected,
            token.value_type(),
        )))
    }
}
