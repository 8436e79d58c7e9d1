//! # DID Resolution Interface
//!
//! The `resolve` function of DID Core §7.1
//! (<https://www.w3.org/TR/did-core/#did-resolution>). Implementations
//! return the document together with its metadata, or one of the
//! resolution errors in [`ResolveError`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ugra_core::Did;

use crate::document::Document;
use crate::error::ResolveError;

/// DID document metadata (DID Core §7.1.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deactivated: bool,
    /// Method-specific metadata properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Resolves a DID to its document and metadata.
pub trait Resolver {
    /// Resolve `input_did`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidDid`], [`ResolveError::NotFound`] or
    /// [`ResolveError::Deactivated`] per DID Core, or an implementation
    /// specific error.
    fn resolve(&self, input_did: &str) -> Result<(Document, DocumentMetadata), ResolveError>;
}

/// A resolver over documents held in memory, keyed by DID.
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver {
    entries: HashMap<Did, (Document, DocumentMetadata)>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the document for its subject DID.
    pub fn insert(&mut self, document: Document, metadata: DocumentMetadata) {
        self.entries.insert(document.id.clone(), (document, metadata));
    }

    /// Decode a raw JSON document and register it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedDocument`] if the bytes do not
    /// decode to a DID document.
    pub fn insert_json(
        &mut self,
        raw: &[u8],
        metadata: DocumentMetadata,
    ) -> Result<Did, ResolveError> {
        let document: Document = serde_json::from_slice(raw)?;
        let id = document.id.clone();
        self.insert(document, metadata);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolver for MemoryResolver {
    fn resolve(&self, input_did: &str) -> Result<(Document, DocumentMetadata), ResolveError> {
        let did = Did::new(input_did).map_err(|_| ResolveError::InvalidDid(input_did.to_string()))?;
        let (document, metadata) = self
            .entries
            .get(&did)
            .ok_or_else(|| ResolveError::NotFound(input_did.to_string()))?;
        if metadata.deactivated {
            return Err(ResolveError::Deactivated(input_did.to_string()));
        }
        tracing::debug!(did = %did, "resolved DID from memory");
        Ok((document.clone(), metadata.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with(deactivated: bool) -> MemoryResolver {
        let mut resolver = MemoryResolver::new();
        let metadata = DocumentMetadata {
            deactivated,
            ..DocumentMetadata::default()
        };
        resolver
            .insert_json(
                br#"{"@context": "https://www.w3.org/ns/did/v1", "id": "did:ugra:abc"}"#,
                metadata,
            )
            .unwrap();
        resolver
    }

    #[test]
    fn test_resolve_found() {
        let resolver = resolver_with(false);
        let (doc, meta) = resolver.resolve("did:ugra:abc").unwrap();
        assert_eq!(doc.id.as_str(), "did:ugra:abc");
        assert!(!meta.deactivated);
    }

    #[test]
    fn test_resolve_invalid_did() {
        let err = resolver_with(false).resolve("not-a-did").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidDid(_)));
    }

    #[test]
    fn test_resolve_not_found() {
        let err = resolver_with(false).resolve("did:ugra:zzz").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[test]
    fn test_resolve_deactivated() {
        let err = resolver_with(true).resolve("did:ugra:abc").unwrap_err();
        assert!(matches!(err, ResolveError::Deactivated(_)));
    }

    #[test]
    fn test_insert_json_rejects_garbage() {
        let mut resolver = MemoryResolver::new();
        let err = resolver
            .insert_json(b"[]", DocumentMetadata::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MalformedDocument(_)));
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_metadata_extra_properties() {
        let meta: DocumentMetadata = serde_json::from_value(serde_json::json!({
            "created": "2021-05-01T10:00:00Z",
            "versionId": "3"
        }))
        .unwrap();
        assert!(meta.created.is_some());
        assert_eq!(meta.properties["versionId"], "3");
    }
}
