//! Authorization service: state preparation and code generation.
//!
//! `prepare` is the front half of the flow: it validates the incoming
//! request, builds the pending [`AuthorizationState`] and hands it out in
//! protected form. `generate` is the back half of the consent step: it
//! re-validates, binds the authenticated principal's scope-filtered claims
//! to a fresh one-time code, stores the code, and returns the state
//! populated with it so the caller can redirect the user-agent back.
//!
//! # Security
//!
//! - Validation failures in `prepare` are loud (the request never reached
//!   a user); protocol failures in `generate` resolve to `None` so an
//!   unknown or misconfigured client learns nothing.
//! - No code is ever issued with an empty claim selection.
//! - Code values are never logged.

use std::sync::Arc;

use time::OffsetDateTime;
use url::Url;

use crate::AuthResult;
use crate::claims::{SupportedScopes, select_claims};
use crate::code::{AuthorizationCode, AuthorizationData, StoredAuthorization};
use crate::config::GrantConfig;
use crate::error::AuthError;
use crate::oauth::authorize::{AuthorizationRequest, GenerateCommand};
use crate::protect::Protector;
use crate::state::AuthorizationState;
use crate::storage::{ClientSecretStorage, CodeStore};
use crate::validation::{self, ValidationError};

/// Service for the authorization half of the code grant flow.
pub struct AuthorizationService {
    /// Repository of registered client secret identities.
    client_secrets: Arc<dyn ClientSecretStorage>,

    /// One-time-use code store.
    code_store: Arc<dyn CodeStore>,

    /// Scope to claim-visibility table.
    supported_scopes: SupportedScopes,

    /// Engine configuration.
    config: GrantConfig,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        client_secrets: Arc<dyn ClientSecretStorage>,
        code_store: Arc<dyn CodeStore>,
        supported_scopes: SupportedScopes,
        config: GrantConfig,
    ) -> Self {
        Self {
            client_secrets,
            code_store,
            supported_scopes,
            config,
        }
    }

    /// Prepares an authorization request for the redirect round-trip.
    ///
    /// Validates the request, builds an [`AuthorizationState`] from the
    /// validated fields, and serializes it through the caller-supplied
    /// protector into an opaque string. No partial state is ever
    /// serialized and no I/O side effect occurs.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with the accumulated field failures
    /// (including an unregistered client id), or a protection error if the
    /// protector fails.
    pub async fn prepare(
        &self,
        request: &AuthorizationRequest,
        protector: &dyn Protector,
    ) -> AuthResult<String> {
        let mut failures = validation::validate_request(request, &self.supported_scopes);

        if failures.is_empty()
            && self
                .client_secrets
                .get_by_client_id(&request.client_id)
                .await?
                .is_none()
        {
            failures.push(ValidationError::new("client_id", "unknown client"));
        }

        if !failures.is_empty() {
            return Err(AuthError::validation(failures));
        }

        let state = Self::build_state(request)?;
        state.to_protected(protector)
    }

    /// Generates a one-time authorization code for an authenticated
    /// principal.
    ///
    /// Returns the authorization state populated with the issued code, or
    /// `None` when the client is unknown, its registered secret is blank,
    /// or the granted scopes expose no claims. All three outcomes are
    /// deliberately indistinguishable to the caller.
    ///
    /// Everything before the single store write is read-only and can be
    /// retried freely.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for malformed commands and storage
    /// errors from the code store.
    pub async fn generate(
        &self,
        command: &GenerateCommand,
    ) -> AuthResult<Option<AuthorizationState>> {
        let failures = validation::validate_request(&command.request, &self.supported_scopes);
        if !failures.is_empty() {
            return Err(AuthError::validation(failures));
        }
        let state = Self::build_state(&command.request)?;

        let Some(identity) = self
            .client_secrets
            .get_by_client_id(&command.request.client_id)
            .await?
        else {
            tracing::debug!(outcome = "unknown_client", "authorization code not issued");
            return Ok(None);
        };

        if identity.has_blank_secret() {
            tracing::debug!(outcome = "blank_secret", "authorization code not issued");
            return Ok(None);
        }

        let selected = select_claims(&self.supported_scopes, &state.scopes, &command.claims);
        if selected.is_empty() {
            tracing::debug!(outcome = "empty_selection", "authorization code not issued");
            return Ok(None);
        }

        let code = AuthorizationCode::generate_value();
        let expires = OffsetDateTime::now_utc() + self.config.authorization_code_lifetime;
        let entry = StoredAuthorization {
            claims: selected,
            data: AuthorizationData {
                client_id: state.client_id.clone(),
                client_secret: identity.client_secret.clone(),
                redirect_uri: state.redirect_uri.clone(),
            },
            expires,
        };

        self.code_store
            .set(&code, &entry, self.config.authorization_code_lifetime)
            .await?;

        Ok(Some(state.to_builder().with_code(code).build()))
    }

    /// Gets the service configuration.
    #[must_use]
    pub fn config(&self) -> &GrantConfig {
        &self.config
    }

    /// Gets the supported scope table.
    #[must_use]
    pub fn supported_scopes(&self) -> &SupportedScopes {
        &self.supported_scopes
    }

    /// Builds an authorization state from an already validated request.
    fn build_state(request: &AuthorizationRequest) -> AuthResult<AuthorizationState> {
        let redirect_uri = Url::parse(&request.redirect_uri)
            .map_err(|e| AuthError::internal(format!("Validated redirect URI rejected: {e}")))?;

        Ok(
            AuthorizationState::builder(&request.client_id, redirect_uri, &request.response_type)
                .with_scopes(request.scopes.clone())
                .with_nonce(request.nonce.clone())
                .with_external_state(request.external_state.clone())
                .build(),
        )
    }
}
