//! Authorization code redemption.
//!
//! Redemption is a state machine:
//!
//! ```text
//! Pending -> Retrieved -> Validated -> Authenticated
//!      \________\____________\______-> Rejected
//! ```
//!
//! Retrieval atomically removes the stored entry, so a code can be
//! redeemed at most once regardless of how the attempt ends. The match
//! checks run in a fixed order and short-circuit on the first failure; no
//! repository or resolver call happens until every locally-checkable field
//! has passed.
//!
//! # Security
//!
//! Every rejection resolves to `None`. A forged, replayed, expired, or
//! mismatched redemption attempt is indistinguishable from "code not
//! found" to the caller. Rejection reasons are only visible in trace
//! output; code and secret values are never logged.

use std::sync::Arc;

use url::Url;

use crate::AuthResult;
use crate::claims::ClaimsIdentity;
use crate::client_secret::verify_client_secret;
use crate::code::StoredAuthorization;
use crate::oauth::authorize::RedeemCommand;
use crate::storage::{ClientSecretStorage, CodeStore, TrustedDomainResolver};

/// Why a redemption attempt was rejected. Trace-level observability only;
/// never exposed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RejectionReason {
    NotFound,
    Expired,
    EmptyClaims,
    BlankAuthorizationData,
    ClientIdMismatch,
    ClientSecretMismatch,
    RedirectUriMismatch,
    UnknownClient,
    SecretVerificationFailed,
    UntrustedDomain,
}

impl RejectionReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::EmptyClaims => "empty_claims",
            Self::BlankAuthorizationData => "blank_authorization_data",
            Self::ClientIdMismatch => "client_id_mismatch",
            Self::ClientSecretMismatch => "client_secret_mismatch",
            Self::RedirectUriMismatch => "redirect_uri_mismatch",
            Self::UnknownClient => "unknown_client",
            Self::SecretVerificationFailed => "secret_verification_failed",
            Self::UntrustedDomain => "untrusted_domain",
        }
    }
}

/// Progress of a single redemption attempt.
enum Redemption {
    Retrieved(StoredAuthorization),
    Validated(StoredAuthorization),
    Authenticated(ClaimsIdentity),
    Rejected(RejectionReason),
}

/// Redeems one-time authorization codes into authenticated identities.
pub struct AuthorizationCodeRedeemer {
    /// One-time-use code store.
    code_store: Arc<dyn CodeStore>,

    /// Repository of registered client secret identities.
    client_secrets: Arc<dyn ClientSecretStorage>,

    /// Redirect domain allow-list check.
    trusted_domains: Arc<dyn TrustedDomainResolver>,
}

impl AuthorizationCodeRedeemer {
    /// Creates a new redeemer.
    #[must_use]
    pub fn new(
        code_store: Arc<dyn CodeStore>,
        client_secrets: Arc<dyn ClientSecretStorage>,
        trusted_domains: Arc<dyn TrustedDomainResolver>,
    ) -> Self {
        Self {
            code_store,
            client_secrets,
            trusted_domains,
        }
    }

    /// Redeems the presented code, returning the authenticated identity.
    ///
    /// The identity is the union of the claims stored with the code and
    /// `additional_claims` from the command. Returns `None` for every
    /// protocol rejection; the code is consumed either way.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage or resolver infrastructure
    /// failures, never for protocol rejections.
    pub async fn authenticate(
        &self,
        command: &RedeemCommand,
    ) -> AuthResult<Option<ClaimsIdentity>> {
        let attempt = self.retrieve(command).await?;
        let attempt = Self::validate(attempt);
        let attempt = self.matches(attempt, command).await?;

        match Self::finish(attempt, command) {
            Redemption::Authenticated(identity) => Ok(Some(identity)),
            Redemption::Rejected(reason) => {
                tracing::debug!(outcome = reason.as_str(), "authorization code rejected");
                Ok(None)
            }
            // finish() only ever returns a terminal state.
            _ => Ok(None),
        }
    }

    /// Retrieve: atomically pull and remove the stored entry.
    async fn retrieve(&self, command: &RedeemCommand) -> AuthResult<Redemption> {
        match self.code_store.pull(&command.code).await? {
            Some(entry) => Ok(Redemption::Retrieved(entry)),
            None => Ok(Redemption::Rejected(RejectionReason::NotFound)),
        }
    }

    /// Decode: reject expired payloads and payloads without usable content.
    fn validate(attempt: Redemption) -> Redemption {
        let entry = match attempt {
            Redemption::Retrieved(entry) => entry,
            other => return other,
        };

        if entry.is_expired() {
            return Redemption::Rejected(RejectionReason::Expired);
        }
        if entry.claims.is_empty() {
            return Redemption::Rejected(RejectionReason::EmptyClaims);
        }
        if entry.data.has_blank_entries() {
            return Redemption::Rejected(RejectionReason::BlankAuthorizationData);
        }

        Redemption::Validated(entry)
    }

    /// Match: guarded, short-circuit checks in a fixed order.
    ///
    /// Local field comparisons run first; the client secret repository and
    /// the trusted domain resolver are only consulted once all of them
    /// pass.
    async fn matches(&self, attempt: Redemption, command: &RedeemCommand) -> AuthResult<Redemption> {
        let entry = match attempt {
            Redemption::Validated(entry) => entry,
            other => return Ok(other),
        };

        // Presented client id must equal the bound client id, byte for byte.
        if entry.data.client_id.as_bytes() != command.client_id.as_bytes() {
            return Ok(Redemption::Rejected(RejectionReason::ClientIdMismatch));
        }

        // Presented secret must equal the bound secret, byte for byte.
        if entry.data.client_secret.as_bytes() != command.client_secret.as_bytes() {
            return Ok(Redemption::Rejected(RejectionReason::ClientSecretMismatch));
        }

        // Presented redirect URI must be absolute, well-formed and equal.
        let redirect_uri = match Url::parse(&command.redirect_uri) {
            Ok(uri) if uri.has_host() => uri,
            _ => return Ok(Redemption::Rejected(RejectionReason::RedirectUriMismatch)),
        };
        if redirect_uri != entry.data.redirect_uri {
            return Ok(Redemption::Rejected(RejectionReason::RedirectUriMismatch));
        }

        // Only now resolve the registered identity.
        let Some(identity) = self
            .client_secrets
            .get_by_client_id(&command.client_id)
            .await?
        else {
            return Ok(Redemption::Rejected(RejectionReason::UnknownClient));
        };

        // The registered secret must verify against the presented secret.
        if !verify_client_secret(&identity, &command.client_secret) {
            return Ok(Redemption::Rejected(
                RejectionReason::SecretVerificationFailed,
            ));
        }

        // The redirect domain must be allow-listed.
        if !self.trusted_domains.is_trusted_domain(&redirect_uri).await? {
            return Ok(Redemption::Rejected(RejectionReason::UntrustedDomain));
        }

        Ok(Redemption::Validated(entry))
    }

    /// Authenticate: build the identity from the stored and supplied claims.
    fn finish(attempt: Redemption, command: &RedeemCommand) -> Redemption {
        let entry = match attempt {
            Redemption::Validated(entry) => entry,
            other => return other,
        };

        let identity = ClaimsIdentity::new(entry.claims).union(&command.additional_claims);
        Redemption::Authenticated(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{Claim, NAME_IDENTIFIER_CLAIM_TYPE};
    use crate::client_secret::ClientSecretIdentity;
    use crate::code::AuthorizationData;
    use crate::storage::StaticTrustedDomainResolver;
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use time::OffsetDateTime;

    struct MockCodeStore {
        entries: RwLock<HashMap<String, StoredAuthorization>>,
    }

    impl MockCodeStore {
        fn new() -> Self {
            Self {
                entries: RwLock::new(HashMap::new()),
            }
        }

        fn insert(&self, code: &str, entry: StoredAuthorization) {
            self.entries
                .write()
                .unwrap()
                .insert(code.to_string(), entry);
        }
    }

    #[async_trait::async_trait]
    impl CodeStore for MockCodeStore {
        async fn pull(&self, code: &str) -> AuthResult<Option<StoredAuthorization>> {
            Ok(self.entries.write().unwrap().remove(code))
        }

        async fn set(
            &self,
            code: &str,
            entry: &StoredAuthorization,
            _ttl: Duration,
        ) -> AuthResult<()> {
            self.insert(code, entry.clone());
            Ok(())
        }

        async fn delete(&self, code: &str) -> AuthResult<()> {
            self.entries.write().unwrap().remove(code);
            Ok(())
        }
    }

    /// Client secret storage that counts lookups, for short-circuit tests.
    struct CountingClientSecretStorage {
        identities: RwLock<HashMap<String, ClientSecretIdentity>>,
        lookups: AtomicUsize,
    }

    impl CountingClientSecretStorage {
        fn new() -> Self {
            Self {
                identities: RwLock::new(HashMap::new()),
                lookups: AtomicUsize::new(0),
            }
        }

        fn add(&self, identity: ClientSecretIdentity) {
            self.identities
                .write()
                .unwrap()
                .insert(identity.client_id.clone(), identity);
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ClientSecretStorage for CountingClientSecretStorage {
        async fn get_by_client_id(
            &self,
            client_id: &str,
        ) -> AuthResult<Option<ClientSecretIdentity>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.identities.read().unwrap().get(client_id).cloned())
        }
    }

    /// Trusted domain resolver that counts calls, for short-circuit tests.
    struct CountingTrustedDomainResolver {
        inner: StaticTrustedDomainResolver,
        calls: AtomicUsize,
    }

    impl CountingTrustedDomainResolver {
        fn new(domains: Vec<String>) -> Self {
            Self {
                inner: StaticTrustedDomainResolver::new(domains),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TrustedDomainResolver for CountingTrustedDomainResolver {
        async fn is_trusted_domain(&self, uri: &Url) -> AuthResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.is_trusted_domain(uri).await
        }
    }

    fn stored_claims() -> Vec<Claim> {
        vec![Claim::new(NAME_IDENTIFIER_CLAIM_TYPE, "user-123")]
    }

    fn stored_entry() -> StoredAuthorization {
        StoredAuthorization {
            claims: stored_claims(),
            data: AuthorizationData {
                client_id: "client-1".to_string(),
                client_secret: "s3cret".to_string(),
                redirect_uri: Url::parse("https://app.example.com/callback").unwrap(),
            },
            expires: OffsetDateTime::now_utc() + time::Duration::minutes(10),
        }
    }

    fn command() -> RedeemCommand {
        RedeemCommand {
            code: "code-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: "s3cret".to_string(),
            redirect_uri: "https://app.example.com/callback".to_string(),
            additional_claims: vec![],
        }
    }

    fn create_redeemer() -> (
        AuthorizationCodeRedeemer,
        Arc<MockCodeStore>,
        Arc<CountingClientSecretStorage>,
        Arc<CountingTrustedDomainResolver>,
    ) {
        let code_store = Arc::new(MockCodeStore::new());
        let client_secrets = Arc::new(CountingClientSecretStorage::new());
        let trusted_domains = Arc::new(CountingTrustedDomainResolver::new(vec![
            "example.com".to_string(),
        ]));

        client_secrets.add(ClientSecretIdentity::new("client-1", "s3cret", vec![]));

        let redeemer = AuthorizationCodeRedeemer::new(
            code_store.clone(),
            client_secrets.clone(),
            trusted_domains.clone(),
        );

        (redeemer, code_store, client_secrets, trusted_domains)
    }

    #[tokio::test]
    async fn test_successful_redemption() {
        let (redeemer, code_store, _, _) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        let identity = redeemer.authenticate(&command()).await.unwrap().unwrap();
        assert_eq!(identity.name_identifier(), Some("user-123"));
    }

    #[tokio::test]
    async fn test_additional_claims_are_merged() {
        let (redeemer, code_store, _, _) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        let mut command = command();
        command.additional_claims = vec![Claim::new("urn:grantway:claims:session", "sess-9")];

        let identity = redeemer.authenticate(&command).await.unwrap().unwrap();
        assert_eq!(identity.claims().len(), 2);
        assert_eq!(
            identity.find("urn:grantway:claims:session").unwrap().value,
            "sess-9"
        );
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let (redeemer, code_store, _, _) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        assert!(redeemer.authenticate(&command()).await.unwrap().is_some());
        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_code_is_consumed_even_when_match_fails() {
        let (redeemer, code_store, _, _) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        let mut bad = command();
        bad.client_secret = "wrong".to_string();
        assert!(redeemer.authenticate(&bad).await.unwrap().is_none());

        // A later valid attempt must also fail: the entry is gone.
        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_code_is_rejected() {
        let (redeemer, _, _, _) = create_redeemer();
        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_rejected() {
        let (redeemer, code_store, _, _) = create_redeemer();
        let mut entry = stored_entry();
        entry.expires = OffsetDateTime::now_utc() - time::Duration::minutes(1);
        code_store.insert("code-1", entry);

        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_claims_are_rejected() {
        let (redeemer, code_store, _, _) = create_redeemer();
        let mut entry = stored_entry();
        entry.claims.clear();
        code_store.insert("code-1", entry);

        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_authorization_data_is_rejected() {
        let (redeemer, code_store, _, _) = create_redeemer();
        let mut entry = stored_entry();
        entry.data.client_secret = String::new();
        code_store.insert("code-1", entry);

        let mut command = command();
        command.client_secret = String::new();
        assert!(redeemer.authenticate(&command).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_client_id_mismatch_short_circuits() {
        let (redeemer, code_store, client_secrets, trusted_domains) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        let mut bad = command();
        bad.client_id = "other-client".to_string();

        assert!(redeemer.authenticate(&bad).await.unwrap().is_none());
        // Neither the repository nor the resolver may be consulted.
        assert_eq!(client_secrets.lookup_count(), 0);
        assert_eq!(trusted_domains.call_count(), 0);
    }

    #[tokio::test]
    async fn test_secret_mismatch_short_circuits() {
        let (redeemer, code_store, client_secrets, trusted_domains) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        let mut bad = command();
        bad.client_secret = "wrong".to_string();

        assert!(redeemer.authenticate(&bad).await.unwrap().is_none());
        assert_eq!(client_secrets.lookup_count(), 0);
        assert_eq!(trusted_domains.call_count(), 0);
    }

    #[tokio::test]
    async fn test_redirect_uri_mismatch_short_circuits() {
        let (redeemer, code_store, client_secrets, trusted_domains) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        let mut bad = command();
        bad.redirect_uri = "https://app.example.com/other".to_string();

        assert!(redeemer.authenticate(&bad).await.unwrap().is_none());
        assert_eq!(client_secrets.lookup_count(), 0);
        assert_eq!(trusted_domains.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_redirect_uri_is_rejected() {
        let (redeemer, code_store, _, _) = create_redeemer();
        code_store.insert("code-1", stored_entry());

        let mut bad = command();
        bad.redirect_uri = "/callback".to_string();
        assert!(redeemer.authenticate(&bad).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unregistered_client_is_rejected_after_local_checks() {
        let code_store = Arc::new(MockCodeStore::new());
        let client_secrets = Arc::new(CountingClientSecretStorage::new());
        let trusted_domains = Arc::new(CountingTrustedDomainResolver::new(vec![
            "example.com".to_string(),
        ]));
        let redeemer = AuthorizationCodeRedeemer::new(
            code_store.clone(),
            client_secrets.clone(),
            trusted_domains.clone(),
        );
        code_store.insert("code-1", stored_entry());

        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
        assert_eq!(client_secrets.lookup_count(), 1);
        assert_eq!(trusted_domains.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stored_secret_rotation_is_rejected() {
        // The code was bound to the old secret; the repository now holds a
        // different one, so verification against the registry fails.
        let (redeemer, code_store, client_secrets, _) = create_redeemer();
        client_secrets.add(ClientSecretIdentity::new("client-1", "rotated", vec![]));
        code_store.insert("code-1", stored_entry());

        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_untrusted_domain_is_rejected() {
        let code_store = Arc::new(MockCodeStore::new());
        let client_secrets = Arc::new(CountingClientSecretStorage::new());
        client_secrets.add(ClientSecretIdentity::new("client-1", "s3cret", vec![]));
        let trusted_domains = Arc::new(CountingTrustedDomainResolver::new(vec![
            "trusted.example".to_string(),
        ]));
        let redeemer = AuthorizationCodeRedeemer::new(
            code_store.clone(),
            client_secrets,
            trusted_domains.clone(),
        );
        code_store.insert("code-1", stored_entry());

        assert!(redeemer.authenticate(&command()).await.unwrap().is_none());
        assert_eq!(trusted_domains.call_count(), 1);
    }
}
