//! Authentication session items from external identity providers.
//!
//! External OAuth providers hand back an untyped string-to-string map
//! describing the tokens they issued. The keys below form a stable wire
//! contract; the resolvers tolerate anything a remote provider may send —
//! a missing or malformed value is treated as absent, never as an error.

use std::collections::HashMap;
use std::fmt;

use time::{Duration, OffsetDateTime, PrimitiveDateTime};

/// Key for the provider-issued access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key for the provider-issued refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Key for the token type (e.g. "Bearer").
pub const TOKEN_TYPE_KEY: &str = "token_type";

/// Key for the absolute expiry as an RFC 1123 date-time string.
pub const EXPIRES_AT_KEY: &str = "expires_at";

/// Key for the relative expiry as decimal seconds.
pub const EXPIRES_IN_KEY: &str = "expires_in";

/// Key for the external token claim type identifier.
pub const EXTERNAL_TOKEN_CLAIM_TYPE_KEY: &str = "external_token_claim_type";

/// The untyped transport format for external OAuth responses.
pub type AuthenticationSessionItems = HashMap<String, String>;

/// Recognized external token claim types.
///
/// This is a fixed enumerated set; any other value in the session items is
/// treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalTokenClaimType {
    /// Token issued by a Microsoft identity provider.
    Microsoft,
    /// Token issued by a Google identity provider.
    Google,
}

impl ExternalTokenClaimType {
    /// Returns the claim type string used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Microsoft => "urn:grantway:claims:microsoft-token",
            Self::Google => "urn:grantway:claims:google-token",
        }
    }

    /// Parses a claim type string; unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "urn:grantway:claims:microsoft-token" => Some(Self::Microsoft),
            "urn:grantway:claims:google-token" => Some(Self::Google),
            _ => None,
        }
    }
}

impl fmt::Display for ExternalTokenClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves the expiry of the external token, if any is known.
///
/// Resolution order:
///
/// 1. An `expires_at` value that parses as an RFC 1123 date-time wins,
///    regardless of any `expires_in` value.
/// 2. Otherwise an `expires_in` value that parses as floating-point seconds
///    yields `now + seconds`.
/// 3. Otherwise no expiry is known.
///
/// Malformed values are treated as absent; this function never fails.
#[must_use]
pub fn resolve_expires(items: &AuthenticationSessionItems) -> Option<OffsetDateTime> {
    if let Some(raw) = non_empty(items, EXPIRES_AT_KEY) {
        if let Some(at) = parse_rfc1123(raw) {
            return Some(at);
        }
    }

    if let Some(raw) = non_empty(items, EXPIRES_IN_KEY) {
        if let Ok(seconds) = raw.trim().parse::<f64>() {
            if seconds.is_finite() {
                return Some(OffsetDateTime::now_utc() + Duration::seconds_f64(seconds));
            }
        }
    }

    None
}

/// Resolves the external token claim type, if present and recognized.
#[must_use]
pub fn resolve_external_token_claim_type(
    items: &AuthenticationSessionItems,
) -> Option<ExternalTokenClaimType> {
    non_empty(items, EXTERNAL_TOKEN_CLAIM_TYPE_KEY).and_then(ExternalTokenClaimType::parse)
}

/// Returns `true` if an access token is present with a non-empty value.
#[must_use]
pub fn has_access_token(items: &AuthenticationSessionItems) -> bool {
    non_empty(items, ACCESS_TOKEN_KEY).is_some()
}

/// Returns `true` if a refresh token is present with a non-empty value.
#[must_use]
pub fn has_refresh_token(items: &AuthenticationSessionItems) -> bool {
    non_empty(items, REFRESH_TOKEN_KEY).is_some()
}

/// Returns `true` if a token type is present with a non-empty value.
#[must_use]
pub fn has_token_type(items: &AuthenticationSessionItems) -> bool {
    non_empty(items, TOKEN_TYPE_KEY).is_some()
}

/// Returns `true` if an absolute expiry is present with a non-empty value.
#[must_use]
pub fn has_expires_at(items: &AuthenticationSessionItems) -> bool {
    non_empty(items, EXPIRES_AT_KEY).is_some()
}

/// Returns `true` if a relative expiry is present with a non-empty value.
#[must_use]
pub fn has_expires_in(items: &AuthenticationSessionItems) -> bool {
    non_empty(items, EXPIRES_IN_KEY).is_some()
}

/// Returns `true` if a recognized external token claim type is present.
#[must_use]
pub fn has_external_token_claim_type(items: &AuthenticationSessionItems) -> bool {
    resolve_external_token_claim_type(items).is_some()
}

fn non_empty<'a>(items: &'a AuthenticationSessionItems, key: &str) -> Option<&'a str> {
    items
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// Parses an RFC 1123 date-time (e.g. `Sat, 29 Aug 2026 12:00:00 GMT`).
fn parse_rfc1123(value: &str) -> Option<OffsetDateTime> {
    let format = time::macros::format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    PrimitiveDateTime::parse(value.trim(), format)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Formats a date-time as an RFC 1123 string, as external providers send it.
#[must_use]
pub fn format_rfc1123(at: OffsetDateTime) -> String {
    let format = time::macros::format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    at.to_offset(time::UtcOffset::UTC)
        .format(format)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, &str)]) -> AuthenticationSessionItems {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_expires_from_expires_in() {
        let items = items(&[(EXPIRES_IN_KEY, "120")]);
        let resolved = resolve_expires(&items).unwrap();

        let expected = OffsetDateTime::now_utc() + Duration::seconds(120);
        assert!((resolved - expected).abs() < Duration::seconds(1));
    }

    #[test]
    fn test_resolve_expires_fractional_seconds() {
        let items = items(&[(EXPIRES_IN_KEY, "90.5")]);
        let resolved = resolve_expires(&items).unwrap();

        let expected = OffsetDateTime::now_utc() + Duration::seconds_f64(90.5);
        assert!((resolved - expected).abs() < Duration::seconds(1));
    }

    #[test]
    fn test_resolve_expires_at_wins_over_expires_in() {
        let at = OffsetDateTime::now_utc() + Duration::seconds(60);
        let items = items(&[
            (EXPIRES_AT_KEY, &format_rfc1123(at)),
            (EXPIRES_IN_KEY, "bogus"),
        ]);

        let resolved = resolve_expires(&items).unwrap();
        assert!((resolved - at).abs() < Duration::seconds(1));
    }

    #[test]
    fn test_resolve_expires_malformed_at_falls_back() {
        let items = items(&[(EXPIRES_AT_KEY, "not a date"), (EXPIRES_IN_KEY, "60")]);
        let resolved = resolve_expires(&items).unwrap();

        let expected = OffsetDateTime::now_utc() + Duration::seconds(60);
        assert!((resolved - expected).abs() < Duration::seconds(1));
    }

    #[test]
    fn test_resolve_expires_nothing_known() {
        assert!(resolve_expires(&items(&[])).is_none());
        assert!(resolve_expires(&items(&[(EXPIRES_IN_KEY, "soon")])).is_none());
        assert!(resolve_expires(&items(&[(EXPIRES_AT_KEY, "")])).is_none());
    }

    #[test]
    fn test_rfc1123_roundtrip() {
        let at = OffsetDateTime::from_unix_timestamp(1_790_000_000).unwrap();
        let formatted = format_rfc1123(at);
        let parsed = parse_rfc1123(&formatted).unwrap();
        assert_eq!(parsed, at);
    }

    #[test]
    fn test_presence_predicates() {
        let populated = items(&[
            (ACCESS_TOKEN_KEY, "token"),
            (REFRESH_TOKEN_KEY, "refresh"),
            (TOKEN_TYPE_KEY, "Bearer"),
        ]);

        assert!(has_access_token(&populated));
        assert!(has_refresh_token(&populated));
        assert!(has_token_type(&populated));
        assert!(!has_expires_at(&populated));
        assert!(!has_expires_in(&populated));

        let blank = items(&[(ACCESS_TOKEN_KEY, "  ")]);
        assert!(!has_access_token(&blank));
    }

    #[test]
    fn test_external_token_claim_type_resolution() {
        let microsoft = items(&[(
            EXTERNAL_TOKEN_CLAIM_TYPE_KEY,
            "urn:grantway:claims:microsoft-token",
        )]);
        assert_eq!(
            resolve_external_token_claim_type(&microsoft),
            Some(ExternalTokenClaimType::Microsoft)
        );
        assert!(has_external_token_claim_type(&microsoft));

        let unknown = items(&[(EXTERNAL_TOKEN_CLAIM_TYPE_KEY, "urn:other:claims:token")]);
        assert_eq!(resolve_external_token_claim_type(&unknown), None);
        assert!(!has_external_token_claim_type(&unknown));
    }

    #[test]
    fn test_claim_type_parse_roundtrip() {
        for claim_type in [
            ExternalTokenClaimType::Microsoft,
            ExternalTokenClaimType::Google,
        ] {
            assert_eq!(
                ExternalTokenClaimType::parse(claim_type.as_str()),
                Some(claim_type)
            );
        }
    }
}
