//! # DID Document
//!
//! DID Core (<https://www.w3.org/TR/did-core/>) lets `@context`,
//! `controller`, the verification relationships and each service's
//! `serviceEndpoint` be written either as a single value or as a set.
//! [`Document`] always holds sets; the custom `serde` impls run the
//! normalization pipeline around the derived field mapping.
//!
//! Decode pipeline (in order):
//!
//! 1. `publicKey` → `verificationMethod` (pre-CR documents)
//! 2. plural `@context`, `controller`, `verificationMethod`
//! 3. plural on each verification relationship
//!
//! Encode pipeline: plural `@context`, unplural `controller`.

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use ugra_core::{normalize_value, Did, KeyType, Normalizer, Uri};

/// The base DID Core JSON-LD context.
pub const DID_CONTEXT_V1: &str = "https://www.w3.org/ns/did/v1";

const CONTEXT_KEY: &str = "@context";
const CONTROLLER_KEY: &str = "controller";
const PUBLIC_KEY_KEY: &str = "publicKey";
const VERIFICATION_METHOD_KEY: &str = "verificationMethod";
const SERVICE_ENDPOINT_KEY: &str = "serviceEndpoint";
const RELATIONSHIP_KEYS: [&str; 5] = [
    "authentication",
    "assertionMethod",
    "keyAgreement",
    "capabilityInvocation",
    "capabilityDelegation",
];

fn decode_normalizers() -> Vec<Normalizer> {
    let mut normalizers = vec![
        Normalizer::key_alias(PUBLIC_KEY_KEY, VERIFICATION_METHOD_KEY),
        Normalizer::plural(CONTEXT_KEY),
        Normalizer::plural(CONTROLLER_KEY),
        Normalizer::plural(VERIFICATION_METHOD_KEY),
    ];
    normalizers.extend(RELATIONSHIP_KEYS.iter().map(|key| Normalizer::plural(*key)));
    normalizers
}

fn encode_normalizers() -> [Normalizer; 2] {
    [
        Normalizer::plural(CONTEXT_KEY),
        Normalizer::unplural(CONTROLLER_KEY),
    ]
}

/// A DID document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Document {
    /// JSON-LD contexts; the first is normally [`DID_CONTEXT_V1`].
    #[serde(rename = "@context")]
    pub context: Vec<Uri>,
    /// The DID subject.
    pub id: Did,
    /// Entities authorized to make changes to the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controller: Vec<Did>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_agreement: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_invocation: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_delegation: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
}

impl Document {
    /// An empty document for `id` carrying only the DID Core context.
    pub fn new(id: Did) -> Self {
        Self {
            context: vec![Uri::from_static(DID_CONTEXT_V1)],
            id,
            controller: Vec::new(),
            verification_method: Vec::new(),
            authentication: Vec::new(),
            assertion_method: Vec::new(),
            key_agreement: Vec::new(),
            capability_invocation: Vec::new(),
            capability_delegation: Vec::new(),
            service: Vec::new(),
        }
    }

    /// Look up a verification method declared in `verificationMethod` by id.
    pub fn verification_method(&self, id: &Uri) -> Option<&VerificationMethod> {
        self.verification_method.iter().find(|vm| &vm.id == id)
    }

    /// Resolve a relationship entry to its verification method, following
    /// references into `verificationMethod`.
    pub fn resolve_relationship<'a>(
        &'a self,
        relationship: &'a VerificationRelationship,
    ) -> Option<&'a VerificationMethod> {
        match relationship {
            VerificationRelationship::Reference(id) => self.verification_method(id),
            VerificationRelationship::Embedded(vm) => Some(vm),
        }
    }

    /// Verification methods usable for authentication.
    pub fn authentication_methods(&self) -> impl Iterator<Item = &VerificationMethod> {
        self.authentication
            .iter()
            .filter_map(|rel| self.resolve_relationship(rel))
    }

    /// Verification methods usable for issuing assertions (credentials).
    pub fn assertion_methods(&self) -> impl Iterator<Item = &VerificationMethod> {
        self.assertion_method
            .iter()
            .filter_map(|rel| self.resolve_relationship(rel))
    }

    /// True if `did` is the subject or one of the controllers.
    pub fn is_controlled_by(&self, did: &Did) -> bool {
        (self.controller.is_empty() && &self.id == did) || self.controller.contains(did)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = Document::serialize(self, serde_json::value::Serializer)
            .map_err(ser::Error::custom)?;
        normalize_value(raw, &encode_normalizers())
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let normalized = normalize_value(raw, &decode_normalizers()).map_err(de::Error::custom)?;
        Document::deserialize(normalized).map_err(de::Error::custom)
    }
}

/// A verification method (public key material).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    pub id: Uri,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub controller: Did,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_base58: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,
}

/// An entry of a verification relationship: either a reference to a method
/// in `verificationMethod` or an embedded method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerificationRelationship {
    Reference(Uri),
    Embedded(VerificationMethod),
}

/// A service endpoint declaration.
///
/// `serviceEndpoint` may be a URI, a map, or a set of either. URIs are
/// wrapped into a set on decode; maps stay maps. A single-element set is
/// written back as the bare value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Service {
    pub id: Uri,
    #[serde(rename = "type")]
    pub service_type: String,
    pub service_endpoint: ServiceEndpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceEndpoint {
    Set(Vec<Value>),
    Map(Map<String, Value>),
}

impl Serialize for Service {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = Service::serialize(self, serde_json::value::Serializer)
            .map_err(ser::Error::custom)?;
        normalize_value(raw, &[Normalizer::unplural(SERVICE_ENDPOINT_KEY)])
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Service {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let normalized = normalize_value(raw, &[Normalizer::plural_value_or_map(SERVICE_ENDPOINT_KEY)])
            .map_err(de::Error::custom)?;
        Service::deserialize(normalized).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "@context": "https://www.w3.org/ns/did/v1",
            "id": "did:ugra:123",
            "controller": "did:ugra:456",
            "publicKey": [{
                "id": "did:ugra:123#key-1",
                "type": "JsonWebKey2020",
                "controller": "did:ugra:123",
                "publicKeyJwk": {"kty": "OKP", "crv": "Ed25519", "x": "abc"}
            }],
            "authentication": "did:ugra:123#key-1",
            "assertionMethod": [{
                "id": "did:ugra:123#key-2",
                "type": "Ed25519VerificationKey2018",
                "controller": "did:ugra:123",
                "publicKeyBase58": "H3C2AVvL"
            }],
            "service": [
                {"id": "did:ugra:123#inbox", "type": "Inbox", "serviceEndpoint": "https://inbox.example.com"},
                {"id": "did:ugra:123#hub", "type": "Hub", "serviceEndpoint": {"origins": ["https://a"]}}
            ]
        })
    }

    #[test]
    fn test_decode_normalizes_singular_members() {
        let doc: Document = serde_json::from_value(sample()).unwrap();
        assert_eq!(doc.context.len(), 1);
        assert_eq!(doc.controller, vec![Did::new("did:ugra:456").unwrap()]);
        assert_eq!(doc.verification_method.len(), 1);
        assert_eq!(doc.authentication.len(), 1);
        assert!(matches!(doc.authentication[0], VerificationRelationship::Reference(_)));
        assert!(matches!(doc.assertion_method[0], VerificationRelationship::Embedded(_)));
    }

    #[test]
    fn test_public_key_alias() {
        let doc: Document = serde_json::from_value(sample()).unwrap();
        assert_eq!(doc.verification_method[0].key_type, KeyType::JsonWebKey2020);
    }

    #[test]
    fn test_service_endpoint_uri_wrapped_map_kept() {
        let doc: Document = serde_json::from_value(sample()).unwrap();
        assert_eq!(
            doc.service[0].service_endpoint,
            ServiceEndpoint::Set(vec![json!("https://inbox.example.com")])
        );
        assert!(matches!(doc.service[1].service_endpoint, ServiceEndpoint::Map(_)));
    }

    #[test]
    fn test_encode_shape() {
        let doc: Document = serde_json::from_value(sample()).unwrap();
        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["@context"], json!(["https://www.w3.org/ns/did/v1"]));
        assert_eq!(out["controller"], json!("did:ugra:456"));
        assert_eq!(out["service"][0]["serviceEndpoint"], json!("https://inbox.example.com"));
        assert!(out.get("publicKey").is_none());
        assert_eq!(out["verificationMethod"][0]["id"], json!("did:ugra:123#key-1"));
    }

    #[test]
    fn test_resolve_relationships() {
        let doc: Document = serde_json::from_value(sample()).unwrap();
        let auth: Vec<_> = doc.authentication_methods().collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].id, "did:ugra:123#key-1");
        let assertion: Vec<_> = doc.assertion_methods().collect();
        assert_eq!(assertion[0].public_key_base58.as_deref(), Some("H3C2AVvL"));
    }

    #[test]
    fn test_controlled_by() {
        let doc: Document = serde_json::from_value(sample()).unwrap();
        assert!(doc.is_controlled_by(&Did::new("did:ugra:456").unwrap()));
        assert!(!doc.is_controlled_by(&Did::new("did:ugra:123").unwrap()));

        let own = Document::new(Did::new("did:ugra:789").unwrap());
        assert!(own.is_controlled_by(&Did::new("did:ugra:789").unwrap()));
    }

    #[test]
    fn test_reject_non_object() {
        assert!(serde_json::from_value::<Document>(json!(["did:ugra:1"])).is_err());
    }
}
