//! # grantway-auth
//!
//! OAuth2-style authorization code grant engine.
//!
//! This crate provides:
//! - Authorization request validation and protected state transport
//! - One-time-use authorization code issuance and redemption
//! - Client secret authentication and trusted redirect domains
//! - Scope-based claim selection
//! - Access and ID token issuance
//! - Protected embedding of external provider tokens as claims
//!
//! ## Overview
//!
//! The engine models the authorization code grant as explicit steps:
//! *Prepare* builds and protects an [`state::AuthorizationState`] for the
//! redirect round-trip; *Generate* validates the request, selects claims
//! for the granted scopes and issues a one-time code; *Authenticate*
//! redeems the code exactly once into a [`claims::ClaimsIdentity`]; the
//! [`token::TokenIssuer`] then signs access and ID tokens for that
//! identity.
//!
//! Storage and the protect/unprotect primitives are injected through
//! traits, so code stores, client registries and cryptography are
//! pluggable.
//!
//! ## Modules
//!
//! - [`config`] - Engine configuration with human-readable lifetimes
//! - [`claims`] - Claims, identities and scope-based claim selection
//! - [`session`] - External provider session items and expiry resolution
//! - [`protect`] - Injected protect/unprotect transform traits
//! - [`validation`] - Accumulating authorization request validation
//! - [`state`] - Authorization state and its protected transport form
//! - [`code`] - Authorization codes and stored authorization entries
//! - [`client_secret`] - Client secret identities and verification
//! - [`external`] - External provider tokens as protected claims
//! - [`oauth`] - The prepare/generate/authenticate protocol steps
//! - [`token`] - Access and ID token issuance
//! - [`storage`] - Storage traits for codes, clients and trusted domains

pub mod claims;
pub mod client_secret;
pub mod code;
pub mod config;
pub mod error;
pub mod external;
pub mod oauth;
pub mod protect;
pub mod session;
pub mod state;
pub mod storage;
pub mod token;
pub mod validation;

pub use claims::{
    Claim, ClaimsIdentity, EMAIL_CLAIM_TYPE, NAME_CLAIM_TYPE, NAME_IDENTIFIER_CLAIM_TYPE,
    ScopeDefinition, SupportedScopes, select_claims, supported_scopes,
};
pub use client_secret::{ClientSecretIdentity, verify_client_secret};
pub use code::{AuthorizationCode, AuthorizationData, StoredAuthorization};
pub use config::GrantConfig;
pub use error::{AuthError, ErrorCategory};
pub use external::{
    ExternalToken, ExternalTokenClaimCreator, REFRESHABLE_TOKEN_VALUE_TYPE, TOKEN_VALUE_TYPE,
};
pub use oauth::{
    AuthorizationCodeRedeemer, AuthorizationRequest, AuthorizationService, GenerateCommand,
    RedeemCommand,
};
pub use protect::{Protector, Unprotector};
pub use session::{AuthenticationSessionItems, ExternalTokenClaimType};
pub use state::{AuthorizationState, AuthorizationStateBuilder};
pub use storage::{
    ClientSecretStorage, CodeStore, StaticTrustedDomainResolver, TrustedDomainResolver,
};
pub use token::{IssuedToken, JwtTokenSigner, TokenIssuer, TokenSigner};
pub use validation::ValidationError;

/// Type alias for authorization engine results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use grantway_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::claims::{Claim, ClaimsIdentity, ScopeDefinition, SupportedScopes};
    pub use crate::config::GrantConfig;
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::external::{ExternalToken, ExternalTokenClaimCreator};
    pub use crate::oauth::{
        AuthorizationCodeRedeemer, AuthorizationRequest, AuthorizationService, GenerateCommand,
        RedeemCommand,
    };
    pub use crate::protect::{Protector, Unprotector};
    pub use crate::session::{AuthenticationSessionItems, ExternalTokenClaimType};
    pub use crate::state::AuthorizationState;
    pub use crate::storage::{
        ClientSecretStorage, CodeStore, StaticTrustedDomainResolver, TrustedDomainResolver,
    };
    pub use crate::token::{IssuedToken, JwtTokenSigner, TokenIssuer, TokenSigner};
}
