//! # ugra-vc — Verifiable Credentials
//!
//! Implements W3C Verifiable Credentials Data Model 1.0 for the ugradid
//! stack:
//!
//! - **Credential** (`credential.rs`): the VC envelope. `type`,
//!   `credentialSubject` and `proof` are singular on the wire when they hold
//!   one value and plural in memory; `@context` is always a list. The
//!   conversion runs through `ugra_core::marshal`.
//!
//! - **Proof** (`proof.rs`): Linked Data proof envelopes. Proof values are
//!   suite specific, so the credential keeps them as raw JSON and callers
//!   decode them into [`Proof`] or a suite type on demand.
//!
//! ## Crate Policy
//!
//! - Depends only on `ugra-core` internally.
//! - No proof verification here; that belongs to the caller's key material.

pub mod credential;
pub mod error;
pub mod proof;

pub use credential::{
    generate_credential_id, CredentialSchema, CredentialStatus, SchemaType, VerifiableCredential,
    SCHEMA_CREDENTIAL_TYPE, VC_CONTEXT_V1, VERIFIABLE_CREDENTIAL_TYPE,
};
pub use error::CredentialError;
pub use proof::{JsonWebSignature2020Proof, Proof};
