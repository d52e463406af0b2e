//! Token issuance.
//!
//! [`TokenSigner`] abstracts the signing backend; [`TokenIssuer`] builds
//! access and ID token payloads from an authenticated identity and hands
//! them to the signer.

pub mod issuer;
pub mod signer;

pub use issuer::{IssuedToken, TokenIssuer};
pub use signer::{JwtTokenSigner, TokenSigner};
