//! Authorization flow command types.

use serde::{Deserialize, Serialize};

use crate::claims::Claim;

/// An incoming authorization request.
///
/// Carries the client-supplied parameters of the front-channel request.
/// Nothing here is trusted until validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Client identifier.
    pub client_id: String,

    /// Redirect URI; must be a well-formed absolute URI.
    pub redirect_uri: String,

    /// Response type; only `code` is supported.
    pub response_type: String,

    /// Requested scopes, in request order.
    pub scopes: Vec<String>,

    /// OpenID Connect nonce for ID token binding.
    #[serde(default)]
    pub nonce: Option<String>,

    /// Opaque state supplied by the client, echoed back unmodified.
    #[serde(default)]
    pub external_state: Option<String>,
}

/// Command for the code generation step.
///
/// Issued after the resource owner has authenticated; `claims` is the full
/// claim set of the authenticated principal, which the engine filters down
/// to what the granted scopes expose.
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    /// The validated authorization request being completed.
    pub request: AuthorizationRequest,

    /// Full claim set of the authenticated principal.
    pub claims: Vec<Claim>,
}

/// Command for redeeming an authorization code.
///
/// Presented by the client on the back channel after the redirect
/// round-trip.
#[derive(Debug, Clone)]
pub struct RedeemCommand {
    /// The authorization code being redeemed.
    pub code: String,

    /// Client identifier presented by the caller.
    pub client_id: String,

    /// Client secret presented by the caller.
    pub client_secret: String,

    /// Redirect URI presented by the caller; must equal the URI bound to
    /// the code.
    pub redirect_uri: String,

    /// Additional claims to merge into the authenticated identity.
    pub additional_claims: Vec<Claim>,
}
