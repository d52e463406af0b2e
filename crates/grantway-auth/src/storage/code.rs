//! Authorization code storage trait.
//!
//! # Security Considerations
//!
//! - Never log authorization codes.
//! - `pull` must be a single atomic remove-and-return so two concurrent
//!   redemption attempts for the same code can never both succeed. This is
//!   the one strict exclusivity requirement in the engine.
//! - Entries should expire server-side at the given TTL even if never
//!   pulled.

use std::time::Duration;

use async_trait::async_trait;

use crate::AuthResult;
use crate::code::StoredAuthorization;

/// Key-value store for one-time-use authorization codes.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Atomically removes and returns the entry for the given code.
    ///
    /// Returns `None` if no entry exists. After this call returns, no other
    /// caller can retrieve the same entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn pull(&self, code: &str) -> AuthResult<Option<StoredAuthorization>>;

    /// Stores an entry under the given code with a TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be stored.
    async fn set(&self, code: &str, entry: &StoredAuthorization, ttl: Duration) -> AuthResult<()>;

    /// Deletes the entry for the given code, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete(&self, code: &str) -> AuthResult<()>;
}
