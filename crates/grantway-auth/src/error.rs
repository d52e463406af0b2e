//! Authorization engine error types.
//!
//! Two classes of failures exist in the engine and they are deliberately
//! kept apart:
//!
//! - **Programming errors** (missing or empty required arguments, broken
//!   configuration) surface as `Err` values that name the offending input.
//! - **Protocol outcomes** (unknown client, expired or replayed code,
//!   mismatched secret, untrusted redirect domain) never surface as errors.
//!   Operations resolve to `None`/`false`/empty so a caller cannot tell a
//!   forged request apart from a missing record.

use std::fmt;

use crate::validation::ValidationError;

/// Errors that can occur during authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required argument was missing or empty.
    #[error("Invalid argument: {parameter}")]
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: String,
    },

    /// One or more request fields failed validation.
    #[error("Validation failed: {} error(s)", failures.len())]
    Validation {
        /// The accumulated validation failures.
        failures: Vec<ValidationError>,
    },

    /// A claim required by the operation is missing from the identity.
    ///
    /// Raised by ID token generation when no subject identifier is present.
    /// This indicates a configuration or integration defect, not an
    /// attacker-controlled input.
    #[error("Missing required claim: {claim}")]
    MissingClaim {
        /// The claim type that was required.
        claim: String,
    },

    /// Failed to protect or unprotect an opaque payload.
    #[error("Protection error: {message}")]
    Protection {
        /// Description of the protection failure.
        message: String,
    },

    /// Failed to sign a token payload.
    #[error("Signing error: {message}")]
    Signing {
        /// Description of the signing failure.
        message: String,
    },

    /// An error occurred while storing or retrieving authorization data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The engine configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidArgument` error naming the parameter.
    #[must_use]
    pub fn invalid_argument(parameter: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
        }
    }

    /// Creates a new `Validation` error from accumulated failures.
    #[must_use]
    pub fn validation(failures: Vec<ValidationError>) -> Self {
        Self::Validation { failures }
    }

    /// Creates a new `MissingClaim` error.
    #[must_use]
    pub fn missing_claim(claim: impl Into<String>) -> Self {
        Self::MissingClaim {
            claim: claim.into(),
        }
    }

    /// Creates a new `Protection` error.
    #[must_use]
    pub fn protection(message: impl Into<String>) -> Self {
        Self::Protection {
            message: message.into(),
        }
    }

    /// Creates a new `Signing` error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by the caller's input.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::Validation { .. } | Self::MissingClaim { .. }
        )
    }

    /// Returns `true` if the error originated inside the engine or its
    /// collaborators.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Protection { .. }
                | Self::Signing { .. }
                | Self::Storage { .. }
                | Self::Configuration { .. }
                | Self::Internal { .. }
        )
    }

    /// Returns the OAuth 2.0 error code for this error.
    ///
    /// Used by embedding layers to render RFC 6749 error responses.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } | Self::Validation { .. } => "invalid_request",
            Self::MissingClaim { .. } => "invalid_grant",
            Self::Protection { .. }
            | Self::Signing { .. }
            | Self::Storage { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => "server_error",
        }
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } => ErrorCategory::Argument,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::MissingClaim { .. } => ErrorCategory::Claims,
            Self::Protection { .. } | Self::Signing { .. } => ErrorCategory::Cryptography,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of authorization errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or empty required arguments.
    Argument,
    /// Request validation failures.
    Validation,
    /// Claim-related failures.
    Claims,
    /// Protector or signer failures.
    Cryptography,
    /// Storage backend failures.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal engine errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argument => write!(f, "argument"),
            Self::Validation => write!(f, "validation"),
            Self::Claims => write!(f, "claims"),
            Self::Cryptography => write!(f, "cryptography"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
