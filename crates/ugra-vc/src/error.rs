//! # Credential Errors

use thiserror::Error;
use ugra_core::MarshalError;

/// Errors raised while decoding or checking a credential.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The raw document could not be normalized.
    #[error("credential normalization failed: {0}")]
    Marshal(#[from] MarshalError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `@context` is empty or does not start with the base VC context.
    #[error("first @context entry must be {expected}, got {found:?}")]
    MissingBaseContext {
        expected: &'static str,
        found: Option<String>,
    },

    /// `type` does not include `VerifiableCredential`.
    #[error("credential type must include VerifiableCredential, got {0:?}")]
    MissingBaseType(Vec<String>),

    /// `expirationDate` precedes `issuanceDate`.
    #[error("credential expires ({expiration}) before it is issued ({issuance})")]
    ExpiresBeforeIssuance { issuance: String, expiration: String },
}
