//! # Verifiable Credential Structure
//!
//! The VC envelope of the W3C VC Data Model 1.0
//! (<https://www.w3.org/TR/vc-data-model/>).
//!
//! The data model lets `type`, `credentialSubject` and `proof` appear as a
//! single value or as an array. In memory `type` and `proof` are always
//! lists and `@context` is always a list; on the wire a one-element list is
//! written as the bare value. `credentialSubject` is kept as raw JSON: one
//! subject is an object, several are an array.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use ugra_core::{normalize_value, Normalizer, Uri};

use crate::error::CredentialError;
use crate::proof::Proof;

/// The base context every credential lists first.
pub const VC_CONTEXT_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// The type every credential carries.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// The type of a credential whose subject is a published credential schema.
pub const SCHEMA_CREDENTIAL_TYPE: &str = "SchemaCredential";

const CONTEXT_KEY: &str = "@context";
const TYPE_KEY: &str = "type";
const SUBJECT_KEY: &str = "credentialSubject";
const PROOF_KEY: &str = "proof";

fn encode_normalizers() -> [Normalizer; 4] {
    [
        Normalizer::plural(CONTEXT_KEY),
        Normalizer::unplural(TYPE_KEY),
        Normalizer::unplural(SUBJECT_KEY),
        Normalizer::unplural(PROOF_KEY),
    ]
}

fn decode_normalizers() -> [Normalizer; 4] {
    [
        Normalizer::plural(CONTEXT_KEY),
        Normalizer::plural(TYPE_KEY),
        Normalizer::unplural(SUBJECT_KEY),
        Normalizer::plural(PROOF_KEY),
    ]
}

/// Build a credential id from the issuer and a local identifier: `{issuer}#{id}`.
pub fn generate_credential_id(issuer: &str, id: &str) -> String {
    format!("{issuer}#{id}")
}

/// A W3C Verifiable Credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Vec<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uri>,
    #[serde(rename = "type")]
    pub types: Vec<Uri>,
    pub issuer: Uri,
    pub issuance_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_schema: Option<CredentialSchema>,
    /// One subject object, or an array of them.
    pub credential_subject: Value,
    /// Proofs, kept raw; see [`VerifiableCredential::proofs`]. `null`
    /// decodes as no proofs.
    #[serde(
        default,
        deserialize_with = "ugra_core::marshal::null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub proof: Vec<Value>,
}

impl VerifiableCredential {
    /// A credential with the base context and type, issued now.
    pub fn new(issuer: Uri, credential_subject: Map<String, Value>) -> Self {
        Self {
            context: vec![Uri::from_static(VC_CONTEXT_V1)],
            id: None,
            types: vec![Uri::from_static(VERIFIABLE_CREDENTIAL_TYPE)],
            issuer,
            issuance_date: Utc::now(),
            expiration_date: None,
            credential_status: None,
            credential_schema: None,
            credential_subject: Value::Object(credential_subject),
            proof: Vec::new(),
        }
    }

    /// Decode a credential from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Marshal`] if the input is not a JSON object
    /// and [`CredentialError::Json`] if it does not have credential shape.
    pub fn from_slice(raw: &[u8]) -> Result<Self, CredentialError> {
        let value: Value = serde_json::from_slice(raw)?;
        let normalized = normalize_value(value, &decode_normalizers())?;
        Ok(VerifiableCredential::deserialize(normalized)?)
    }

    /// Check the structural rules of the data model.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::MissingBaseContext`] if `@context` does not start
    ///   with [`VC_CONTEXT_V1`].
    /// - [`CredentialError::MissingBaseType`] if `type` lacks
    ///   [`VERIFIABLE_CREDENTIAL_TYPE`].
    /// - [`CredentialError::ExpiresBeforeIssuance`] if the dates are inverted.
    pub fn validate(&self) -> Result<(), CredentialError> {
        match self.context.first() {
            Some(first) if first == VC_CONTEXT_V1 => {}
            other => {
                return Err(CredentialError::MissingBaseContext {
                    expected: VC_CONTEXT_V1,
                    found: other.map(ToString::to_string),
                })
            }
        }
        if !self.is_type(VERIFIABLE_CREDENTIAL_TYPE) {
            return Err(CredentialError::MissingBaseType(
                self.types.iter().map(ToString::to_string).collect(),
            ));
        }
        if let Some(expiration) = self.expiration_date {
            if expiration < self.issuance_date {
                return Err(CredentialError::ExpiresBeforeIssuance {
                    issuance: self.issuance_date.to_rfc3339(),
                    expiration: expiration.to_rfc3339(),
                });
            }
        }
        Ok(())
    }

    /// True if `type` contains `credential_type`.
    pub fn is_type(&self, credential_type: &str) -> bool {
        self.types.iter().any(|t| t == credential_type)
    }

    /// True if `@context` contains `context`.
    pub fn contains_context(&self, context: &str) -> bool {
        self.context.iter().any(|c| c == context)
    }

    /// The subject objects, whether one or several were given.
    pub fn credential_subjects(&self) -> Vec<&Map<String, Value>> {
        match &self.credential_subject {
            Value::Object(subject) => vec![subject],
            Value::Array(subjects) => subjects.iter().filter_map(Value::as_object).collect(),
            _ => Vec::new(),
        }
    }

    /// Decode each subject into `T`.
    pub fn credential_subject_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, CredentialError> {
        self.credential_subjects()
            .into_iter()
            .map(|subject| Ok(serde_json::from_value(Value::Object(subject.clone()))?))
            .collect()
    }

    /// Decode each proof into `T`, for suite-specific proof types.
    pub fn proof_values<T: DeserializeOwned>(&self) -> Result<Vec<T>, CredentialError> {
        self.proof
            .iter()
            .map(|proof| Ok(serde_json::from_value(proof.clone())?))
            .collect()
    }

    /// The common members of each proof.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Json`] if any proof lacks `type` or
    /// `verificationMethod`.
    pub fn proofs(&self) -> Result<Vec<Proof>, CredentialError> {
        self.proof_values()
    }
}

impl Serialize for VerifiableCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = VerifiableCredential::serialize(self, serde_json::value::Serializer)
            .map_err(ser::Error::custom)?;
        normalize_value(raw, &encode_normalizers())
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VerifiableCredential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let normalized = normalize_value(raw, &decode_normalizers()).map_err(de::Error::custom)?;
        VerifiableCredential::deserialize(normalized).map_err(de::Error::custom)
    }
}

/// `credentialStatus`: where to check revocation or suspension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialStatus {
    pub id: Uri,
    #[serde(rename = "type")]
    pub status_type: String,
}

/// `credentialSchema`: the schema the subject conforms to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSchema {
    pub id: Uri,
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
}

/// Credential schema validator type. Unknown names are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchemaType {
    /// <https://w3c-ccg.github.io/vc-json-schemas/>
    JsonSchemaValidator2018,
    Other(String),
}

impl SchemaType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::JsonSchemaValidator2018 => "JsonSchemaValidator2018",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for SchemaType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "JsonSchemaValidator2018" => Self::JsonSchemaValidator2018,
            _ => Self::Other(value),
        }
    }
}

impl From<SchemaType> for String {
    fn from(value: SchemaType) -> Self {
        match value {
            SchemaType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}
