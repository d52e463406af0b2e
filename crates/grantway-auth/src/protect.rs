//! Protector and unprotector seams.
//!
//! The engine never implements cryptography itself. Anything that must
//! cross a trust boundary in opaque form (the authorization state across
//! the redirect, external tokens embedded in claims) is passed through an
//! injected transform pair. Authenticated encryption is the expected
//! implementation; the engine only requires that
//! `unprotect(protect(x)) == x`.

use crate::AuthResult;

/// Transforms an internal string into an opaque form safe to hand to a
/// client.
pub trait Protector: Send + Sync {
    /// Protects the given value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transform fails.
    fn protect(&self, value: &str) -> AuthResult<String>;
}

/// Reverses a [`Protector`] transform.
pub trait Unprotector: Send + Sync {
    /// Unprotects the given value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid protected payload.
    fn unprotect(&self, value: &str) -> AuthResult<String>;
}

impl<F> Protector for F
where
    F: Fn(&str) -> AuthResult<String> + Send + Sync,
{
    fn protect(&self, value: &str) -> AuthResult<String> {
        self(value)
    }
}

impl<F> Unprotector for F
where
    F: Fn(&str) -> AuthResult<String> + Send + Sync,
{
    fn unprotect(&self, value: &str) -> AuthResult<String> {
        self(value)
    }
}
