//! Pure request validation.
//!
//! Validation is a sequence of independent pure functions. Each function
//! checks one field and returns `Option<ValidationError>`; failures
//! accumulate into a list instead of short-circuiting, so a caller sees
//! every problem with a request at once. No validator holds state.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::claims::SupportedScopes;
use crate::oauth::authorize::AuthorizationRequest;

/// The response type supported by the engine.
pub const RESPONSE_TYPE_CODE: &str = "code";

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: &'static str,

    /// Description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validates that the client id is present.
#[must_use]
pub fn validate_client_id(client_id: &str) -> Option<ValidationError> {
    if client_id.trim().is_empty() {
        return Some(ValidationError::new("client_id", "must not be empty"));
    }
    None
}

/// Validates that the redirect URI is a well-formed absolute URI.
#[must_use]
pub fn validate_redirect_uri(redirect_uri: &str) -> Option<ValidationError> {
    if redirect_uri.trim().is_empty() {
        return Some(ValidationError::new("redirect_uri", "must not be empty"));
    }
    match Url::parse(redirect_uri) {
        Ok(url) if url.has_host() => None,
        Ok(_) => Some(ValidationError::new(
            "redirect_uri",
            "must be an absolute URI with a host",
        )),
        Err(_) => Some(ValidationError::new(
            "redirect_uri",
            "must be a well-formed absolute URI",
        )),
    }
}

/// Validates that the response type is the supported `code` type.
#[must_use]
pub fn validate_response_type(response_type: &str) -> Option<ValidationError> {
    if response_type != RESPONSE_TYPE_CODE {
        return Some(ValidationError::new(
            "response_type",
            format!("unsupported response type: {response_type}"),
        ));
    }
    None
}

/// Validates that at least one scope was requested and that every requested
/// scope is in the supported set.
#[must_use]
pub fn validate_scopes(scopes: &[String], supported: &SupportedScopes) -> Option<ValidationError> {
    if scopes.is_empty() {
        return Some(ValidationError::new("scopes", "must not be empty"));
    }
    for scope in scopes {
        if !supported.contains_key(scope) {
            return Some(ValidationError::new(
                "scopes",
                format!("unsupported scope: {scope}"),
            ));
        }
    }
    None
}

/// Runs every field validator against the request, accumulating failures.
#[must_use]
pub fn validate_request(
    request: &AuthorizationRequest,
    supported: &SupportedScopes,
) -> Vec<ValidationError> {
    [
        validate_client_id(&request.client_id),
        validate_redirect_uri(&request.redirect_uri),
        validate_response_type(&request.response_type),
        validate_scopes(&request.scopes, supported),
    ]
    .into_iter()
    .flatten()
    .collect()
}
