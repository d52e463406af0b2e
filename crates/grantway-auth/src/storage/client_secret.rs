//! Client secret identity storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::client_secret::ClientSecretIdentity;

/// Repository of registered client secret identities.
#[async_trait]
pub trait ClientSecretStorage: Send + Sync {
    /// Finds a client secret identity by client id.
    ///
    /// Identities are never looked up by secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get_by_client_id(&self, client_id: &str)
    -> AuthResult<Option<ClientSecretIdentity>>;
}
