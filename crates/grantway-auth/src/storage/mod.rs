//! Storage traits for authorization data.
//!
//! The engine owns no persistence. These traits are the seams through
//! which backends plug in; `grantway-db-memory` provides in-memory
//! implementations.

mod client_secret;
mod code;
mod trusted_domain;

pub use client_secret::ClientSecretStorage;
pub use code::CodeStore;
pub use trusted_domain::{StaticTrustedDomainResolver, TrustedDomainResolver};
