//! # DID Resolution Errors
//!
//! The error conditions named by DID Core §7.1, plus malformed documents.

use thiserror::Error;

/// Errors returned by a [`crate::Resolver`].
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The supplied DID does not conform to DID syntax.
    #[error("supplied DID is invalid: {0}")]
    InvalidDid(String),

    /// The resolver could not find a document for the DID.
    #[error("supplied DID wasn't found: {0}")]
    NotFound(String),

    /// The DID has been deactivated.
    #[error("supplied DID is deactivated: {0}")]
    Deactivated(String),

    /// A document was found but could not be decoded.
    #[error("malformed DID document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}
