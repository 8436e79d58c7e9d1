//! # Schema Errors
//!
//! One error enum for the builder, the ID/version helpers, the evolution
//! analyzer and validation, plus [`UpdateRejection`] which pairs a failed
//! analysis result with its cause.

use thiserror::Error;
use ugra_core::ValidationError;
use ugra_vc::CredentialError;

use crate::evolution::UpdateResult;
use crate::validate::ValidationViolations;

/// Errors raised by the credential schema layer.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two attributes at the same level share a name.
    #[error("duplicate property: {0}")]
    DuplicateAttribute(String),

    /// An attribute (or array item) declares a kind the builder does not know.
    #[error("unknown attr type: {attribute_type} (attribute '{attribute}')")]
    UnknownAttributeType {
        attribute: String,
        attribute_type: String,
    },

    /// An array attribute has no item type.
    #[error("array attribute '{0}' has no item type")]
    MissingItemType(String),

    /// A required builder field is empty.
    #[error("builder {0} is required")]
    IncompleteBuilder(&'static str),

    /// A numeric bound is NaN or infinite and cannot be written as JSON.
    #[error("attribute '{attribute}' has a non-finite {keyword}")]
    NonFiniteBound {
        attribute: String,
        keyword: &'static str,
    },

    /// An evolution precondition failed.
    #[error("{0}")]
    InvalidUpdateInput(String),

    /// The updated schema is identical for every rule.
    #[error("Schema has not been updated")]
    NoChangeDetected,

    #[error("'{0}' is an unrecognized version format")]
    UnrecognizedVersionFormat(String),

    #[error("'{0}' schema id is in an unrecognized format")]
    UnrecognizedIdFormat(String),

    /// A record's `version` member disagrees with the version in its `id`.
    #[error("schema version '{version}' does not match id version '{id_version}'")]
    VersionMismatch { version: String, id_version: String },

    /// A document (or a schema, against the meta-schema) failed validation.
    #[error("Invalid schema: {0}")]
    SchemaValidationFailed(ValidationViolations),

    /// Input that must be JSON is not.
    #[error("{what} is not valid json: {reason}")]
    InvalidJson { what: &'static str, reason: String },

    /// A document file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad { path: String, reason: String },

    /// JSON (de)serialization of a typed value failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Identity(#[from] ValidationError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// A schema update the analyzer refused, with the `valid = false` result
/// that describes it.
#[derive(Error, Debug)]
#[error("schema update rejected: {error}")]
pub struct UpdateRejection {
    pub result: UpdateResult,
    #[source]
    pub error: SchemaError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SchemaError::DuplicateAttribute("name".to_string()).to_string(),
            "duplicate property: name"
        );
        assert_eq!(
            SchemaError::UnrecognizedVersionFormat("1".to_string()).to_string(),
            "'1' is an unrecognized version format"
        );
        assert_eq!(
            SchemaError::NoChangeDetected.to_string(),
            "Schema has not been updated"
        );
    }

    #[test]
    fn test_identity_error_converts() {
        let err: SchemaError = ugra_core::Did::new("nope").unwrap_err().into();
        assert!(matches!(err, SchemaError::Identity(_)));
    }
}
