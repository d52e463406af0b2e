//! Papaya-backed code and client secret stores.

use std::time::Duration;

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use time::OffsetDateTime;

use grantway_auth::client_secret::ClientSecretIdentity;
use grantway_auth::code::StoredAuthorization;
use grantway_auth::storage::{ClientSecretStorage, CodeStore};
use grantway_auth::AuthResult;

/// A stored authorization together with its eviction deadline.
#[derive(Debug, Clone)]
struct CodeEntry {
    authorization: StoredAuthorization,
    deadline: OffsetDateTime,
}

impl CodeEntry {
    fn is_past_deadline(&self, now: OffsetDateTime) -> bool {
        now >= self.deadline
    }
}

/// In-memory one-time-use code store.
///
/// # Concurrency
///
/// Backed by a lock-free papaya map. `pull` relies on the map's atomic
/// remove: under concurrent redemption of the same code exactly one caller
/// observes the entry.
pub struct InMemoryCodeStore {
    entries: PapayaHashMap<String, CodeEntry>,
}

impl InMemoryCodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: PapayaHashMap::new(),
        }
    }

    /// Removes entries whose deadline has passed.
    ///
    /// `pull` already treats stale entries as absent; this reclaims their
    /// memory. Intended to run from a periodic maintenance task. Returns
    /// the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let guard = self.entries.pin();

        let stale: Vec<String> = guard
            .iter()
            .filter(|(_, entry)| entry.is_past_deadline(now))
            .map(|(code, _)| code.clone())
            .collect();

        let mut removed = 0;
        for code in &stale {
            if guard.remove(code).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(count = removed, "evicted expired authorization codes");
        }
        removed
    }

    /// Number of live entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.pin().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn pull(&self, code: &str) -> AuthResult<Option<StoredAuthorization>> {
        let guard = self.entries.pin();
        match guard.remove(code) {
            Some(entry) if !entry.is_past_deadline(OffsetDateTime::now_utc()) => {
                Ok(Some(entry.authorization.clone()))
            }
            // A stale entry is indistinguishable from an absent one.
            _ => Ok(None),
        }
    }

    async fn set(
        &self,
        code: &str,
        entry: &StoredAuthorization,
        ttl: Duration,
    ) -> AuthResult<()> {
        let guard = self.entries.pin();
        guard.insert(
            code.to_string(),
            CodeEntry {
                authorization: entry.clone(),
                deadline: OffsetDateTime::now_utc() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, code: &str) -> AuthResult<()> {
        self.entries.pin().remove(code);
        Ok(())
    }
}

/// In-memory client secret registry.
pub struct InMemoryClientSecretStore {
    identities: PapayaHashMap<String, ClientSecretIdentity>,
}

impl InMemoryClientSecretStore {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            identities: PapayaHashMap::new(),
        }
    }

    /// Registers an identity, replacing any previous one for the client id.
    pub fn add(&self, identity: ClientSecretIdentity) {
        self.identities
            .pin()
            .insert(identity.client_id.clone(), identity);
    }

    /// Removes the identity for the client id.
    pub fn remove(&self, client_id: &str) {
        self.identities.pin().remove(client_id);
    }
}

impl Default for InMemoryClientSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientSecretStorage for InMemoryClientSecretStore {
    async fn get_by_client_id(&self, client_id: &str) -> AuthResult<Option<ClientSecretIdentity>> {
        Ok(self.identities.pin().get(client_id).cloned())
    }
}
