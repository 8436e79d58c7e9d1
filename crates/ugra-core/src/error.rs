//! # Error Hierarchy
//!
//! Structured error types for the foundational layer, built with `thiserror`.
//! Higher crates (`ugra-vc`, `ugra-schema`, `ugra-did`) define their own
//! enums and wrap these via `#[from]`.

use thiserror::Error;

/// Errors raised by the normalization pipeline.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// The input parsed as JSON but is not a JSON object, or is not JSON at all.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Re-serialization of the normalized tree failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for identifier newtypes.
///
/// Each carries the rejected input so callers can report it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// DID does not conform to W3C DID syntax (did:method:identifier).
    #[error("invalid DID format: \"{0}\" (expected did:<method>:<identifier>)")]
    InvalidDid(String),

    /// URI contains characters that can never appear in a URI reference,
    /// or an absolute URI failed to parse.
    #[error("invalid URI: \"{value}\" ({reason})")]
    InvalidUri {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_document_display() {
        let err = MarshalError::MalformedDocument("expected a JSON object, got array".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("malformed document"));
        assert!(msg.contains("got array"));
    }

    #[test]
    fn test_json_error_wraps_serde() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MarshalError::from(inner);
        assert!(format!("{err}").starts_with("JSON error"));
    }

    #[test]
    fn test_invalid_did_display() {
        let err = ValidationError::InvalidDid("bad:did".to_string());
        assert!(format!("{err}").contains("bad:did"));
    }

    #[test]
    fn test_invalid_uri_display() {
        let err = ValidationError::InvalidUri {
            value: "a\u{0}b".to_string(),
            reason: "control character".to_string(),
        };
        assert!(format!("{err}").contains("control character"));
    }
}
