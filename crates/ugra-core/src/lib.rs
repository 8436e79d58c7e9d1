//! # ugra-core — Foundational Types for the ugradid Stack
//!
//! Leaf crate of the workspace. It owns the pieces every document type
//! needs before any typed decoding happens.
//!
//! ## Modules
//!
//! - **`marshal`**: the flexible-arity normalization pipeline. DID documents
//!   and Verifiable Credentials allow some members to be a single value or an
//!   array; an ordered list of [`Normalizer`]s rewrites the generic JSON tree
//!   into exactly one shape before (or after) `serde` sees it.
//!
//! - **`identity`**: the validated [`Did`] newtype.
//!
//! - **`uri`**: [`Uri`], a verbatim URI reference accepting both absolute URIs
//!   and JSON-LD terms.
//!
//! - **`registry`**: [`KeyType`] and [`ProofType`] from the Linked Data suite
//!   registry.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ugra-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod marshal;
pub mod registry;
pub mod uri;

pub use error::{MarshalError, ValidationError};
pub use identity::Did;
pub use marshal::{normalize_document, normalize_value, Normalizer};
pub use registry::{KeyType, ProofType};
pub use uri::Uri;
