//! # URI References
//!
//! Credential `@context`, `type`, `issuer` and `id` members are URI
//! references: either absolute URIs (`https://www.w3.org/2018/credentials/v1`,
//! `did:ugra:abc`) or bare terms resolved through the JSON-LD context
//! (`VerifiableCredential`). [`Uri`] accepts both, keeps the caller's exact
//! spelling, and serializes as a JSON string.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A URI reference, stored verbatim.
///
/// Absolute URIs (those with a scheme) are checked with the `url` crate;
/// relative references are only checked for control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uri(String);

impl Uri {
    /// Parse a raw URI reference.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidUri`] if the input contains control
    /// characters or is an absolute URI the `url` crate cannot parse.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let value = input.into();

        if value.chars().any(char::is_control) {
            return Err(ValidationError::InvalidUri {
                value,
                reason: "invalid control character in URI".to_string(),
            });
        }

        if has_scheme(&value) {
            if let Err(e) = url::Url::parse(&value) {
                return Err(ValidationError::InvalidUri {
                    reason: e.to_string(),
                    value,
                });
            }
        }

        Ok(Self(value))
    }

    /// Wrap a compile-time constant known to be a valid URI, such as a
    /// JSON-LD context URL.
    pub fn from_static(value: &'static str) -> Self {
        debug_assert!(Self::parse(value).is_ok(), "invalid static URI: {value}");
        Self(value.to_string())
    }

    /// Access the URI as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the reference carries a scheme (`https:`, `did:`, `urn:`, ...).
    pub fn is_absolute(&self) -> bool {
        has_scheme(&self.0)
    }
}

/// RFC 3986 §3.1: `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`, then `:`.
fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl std::fmt::Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Uri {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Uri {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Uri> for String {
    fn from(uri: Uri) -> Self {
        uri.0
    }
}

impl PartialEq<str> for Uri {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Uri {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
