//! Claims, identities, and scope-based claim selection.
//!
//! A [`Claim`] is a typed assertion about a principal. A [`ClaimsIdentity`]
//! is the ordered claim collection produced by a successful authorization
//! code redemption. Scope-based selection filters a full claim set down to
//! the claims the granted scopes actually expose; a claim not exposed by any
//! granted scope never leaves the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Claim type for the subject identifier of a principal.
pub const NAME_IDENTIFIER_CLAIM_TYPE: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

/// Claim type for the display name of a principal.
pub const NAME_CLAIM_TYPE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";

/// Claim type for the email address of a principal.
pub const EMAIL_CLAIM_TYPE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/email";

/// A single claim about a principal.
///
/// `value_type` records the logical type of the payload when the value is
/// not plain text (e.g. a protected external token). It is part of the wire
/// contract consumers use to decide how to deserialize the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// The claim type (name).
    pub claim_type: String,

    /// The claim value.
    pub value: String,

    /// Logical type of the value, when not plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

impl Claim {
    /// Creates a new plain-text claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: None,
        }
    }

    /// Creates a new claim with an explicit value type.
    #[must_use]
    pub fn with_value_type(
        claim_type: impl Into<String>,
        value: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: Some(value_type.into()),
        }
    }
}

/// An authenticated principal's claim collection.
///
/// Built by the redemption step as the union of the claims stored with the
/// authorization code and any additional claims supplied at authentication
/// time. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsIdentity {
    claims: Vec<Claim>,
}

impl ClaimsIdentity {
    /// Creates a new identity from a claim collection.
    #[must_use]
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    /// Returns the claims in this identity.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Finds the first claim with the given type.
    #[must_use]
    pub fn find(&self, claim_type: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.claim_type == claim_type)
    }

    /// Returns the subject identifier claim value, if present.
    #[must_use]
    pub fn name_identifier(&self) -> Option<&str> {
        self.find(NAME_IDENTIFIER_CLAIM_TYPE).map(|c| c.value.as_str())
    }

    /// Returns `true` if the identity carries no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Returns a new identity extended with the given claims.
    ///
    /// Claims whose type is already present are not duplicated; the
    /// original claim wins.
    #[must_use]
    pub fn union(&self, additional: &[Claim]) -> Self {
        let mut claims = self.claims.clone();
        for claim in additional {
            if !claims.iter().any(|c| c.claim_type == claim.claim_type) {
                claims.push(claim.clone());
            }
        }
        Self { claims }
    }
}

/// Definition of a single supported scope.
///
/// Lists the claim types a scope exposes when granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeDefinition {
    /// Scope name as requested by clients.
    pub name: String,

    /// Human-readable description of the scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Claim types exposed when this scope is granted.
    pub related_claims: Vec<String>,
}

impl ScopeDefinition {
    /// Creates a new scope definition.
    #[must_use]
    pub fn new(name: impl Into<String>, related_claims: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            related_claims,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `true` if this scope exposes the given claim type.
    #[must_use]
    pub fn exposes(&self, claim_type: &str) -> bool {
        self.related_claims.iter().any(|c| c == claim_type)
    }
}

/// Scope name to definition table.
pub type SupportedScopes = HashMap<String, ScopeDefinition>;

/// Builds a supported scope table from the given definitions.
#[must_use]
pub fn supported_scopes(definitions: Vec<ScopeDefinition>) -> SupportedScopes {
    definitions
        .into_iter()
        .map(|d| (d.name.clone(), d))
        .collect()
}

/// Selects the claims exposed by the requested scopes.
///
/// For each requested scope present in `supported`, the claims that scope
/// exposes are included. A claim present in `full_claims` but not exposed by
/// any granted scope is excluded. Order is not significant; duplicates are
/// dropped. Callers at the code-generation step must treat an empty
/// selection as a hard failure.
#[must_use]
pub fn select_claims(
    supported: &SupportedScopes,
    requested_scopes: &[String],
    full_claims: &[Claim],
) -> Vec<Claim> {
    let mut selected: Vec<Claim> = Vec::new();
    for claim in full_claims {
        let exposed = requested_scopes
            .iter()
            .filter_map(|scope| supported.get(scope))
            .any(|definition| definition.exposes(&claim.claim_type));
        if exposed && !selected.iter().any(|c| c.claim_type == claim.claim_type) {
            selected.push(claim.clone());
        }
    }
    selected
}
