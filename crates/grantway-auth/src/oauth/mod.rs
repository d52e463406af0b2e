//! OAuth 2.0 authorization code grant flow.
//!
//! Control flow across the modules here:
//!
//! 1. [`authorize::AuthorizationRequest`] → [`service::AuthorizationService::prepare`]
//!    builds and protects an [`AuthorizationState`](crate::state::AuthorizationState),
//!    returned as an opaque `state` string.
//! 2. [`service::AuthorizationService::generate`] validates the command,
//!    selects claims, issues a one-time code and stores it.
//! 3. After the redirect round-trip,
//!    [`redeem::AuthorizationCodeRedeemer::authenticate`] redeems the code
//!    exactly once and returns an authenticated claims identity.

pub mod authorize;
pub mod redeem;
pub mod service;

pub use authorize::{AuthorizationRequest, GenerateCommand, RedeemCommand};
pub use redeem::AuthorizationCodeRedeemer;
pub use service::AuthorizationService;
