//! # ugra-did — DID Documents
//!
//! W3C DID Core documents as they appear on the wire, decoded into one
//! fixed shape.
//!
//! - **Document** (`document.rs`): [`Document`] with its verification
//!   methods, verification relationships and services. Members DID Core
//!   allows as "value or set" are normalized to sets on decode.
//!
//! - **Resolver** (`resolver.rs`): the [`Resolver`] interface from DID
//!   Resolution, [`DocumentMetadata`], and an in-memory [`MemoryResolver`].
//!   Network-backed resolvers live outside this workspace.
//!
//! ## Crate Policy
//!
//! - Depends only on `ugra-core` internally.
//! - All flexible-arity handling goes through `ugra_core::marshal`.

pub mod document;
pub mod error;
pub mod resolver;

pub use document::{
    Document, Service, ServiceEndpoint, VerificationMethod, VerificationRelationship,
    DID_CONTEXT_V1,
};
pub use error::ResolveError;
pub use resolver::{DocumentMetadata, MemoryResolver, Resolver};
