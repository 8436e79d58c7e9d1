//! # Identity Newtypes
//!
//! The W3C Decentralized Identifier used as schema author and credential
//! issuer. Format is validated at construction and on deserialization, so a
//! `Did` held anywhere in the workspace is always syntactically valid.
//!
//! Reference: <https://www.w3.org/TR/did-core/#did-syntax>

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// W3C Decentralized Identifier (DID).
///
/// Format: `did:<method>:<method-specific-id>`
///
/// # Validation
///
/// - Must start with `did:`
/// - Method name must be non-empty, lowercase alphanumeric
/// - Method-specific identifier must be non-empty and contain no whitespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Create a DID from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDid`] if the string does not
    /// match the `did:method:identifier` format.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        let invalid = || ValidationError::InvalidDid(s.to_string());

        let rest = s.strip_prefix("did:").ok_or_else(invalid)?;
        let (method, identifier) = rest.split_once(':').ok_or_else(invalid)?;

        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(invalid());
        }

        if identifier.is_empty() || identifier.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(())
    }

    /// Access the DID string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The DID method (between the first and second colons).
    pub fn method(&self) -> &str {
        self.0[4..].split(':').next().unwrap_or_default()
    }

    /// Everything after `did:<method>:`.
    pub fn method_specific_id(&self) -> &str {
        let after_method = 4 + self.method().len() + 1;
        &self.0[after_method..]
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Did {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Did {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_did_valid_examples() {
        assert!(Did::new("did:ugra:abcdefghi").is_ok());
        assert!(Did::new("did:web:example.com").is_ok());
        assert!(Did::new("did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK").is_ok());
    }

    #[test]
    fn test_did_method_extraction() {
        let did = Did::new("did:ugra:abc:def").unwrap();
        assert_eq!(did.method(), "ugra");
        assert_eq!(did.method_specific_id(), "abc:def");
    }

    #[test]
    fn test_did_rejects_invalid() {
        assert!(Did::new("").is_err());
        assert!(Did::new("notadid").is_err());
        assert!(Did::new("did:").is_err());
        assert!(Did::new("did::something").is_err());
        assert!(Did::new("did:Ugra:id").is_err());
        assert!(Did::new("did:ugra:").is_err());
        assert!(Did::new("did:ugra:a b").is_err());
    }

    #[test]
    fn test_did_serde_validates() {
        let did: Did = serde_json::from_str(r#""did:ugra:123""#).unwrap();
        assert_eq!(did.as_str(), "did:ugra:123");
        assert_eq!(serde_json::to_string(&did).unwrap(), r#""did:ugra:123""#);
        assert!(serde_json::from_str::<Did>(r#""nope""#).is_err());
    }

    #[test]
    fn test_did_equality() {
        let a = Did::new("did:ugra:123").unwrap();
        let b: Did = "did:ugra:123".parse().unwrap();
        let c = Did::new("did:ugra:456").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
