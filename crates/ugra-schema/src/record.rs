//! # Credential Schema Record
//!
//! A published credential schema: identifying metadata plus the JSON Schema
//! document that constrains `credentialSubject`. Records are immutable once
//! published; an update is a new record compared against the old one by
//! [`crate::evolution::validate_schema_update`].
//!
//! Wire format (metadata members are flattened next to `schema`):
//!
//! ```json
//! {
//!   "type": "https://w3c-ccg.github.io/vc-json-schemas/schema/1.0/schema.json",
//!   "version": "1.0",
//!   "id": "did:ugra:abc;id=17de…;version=1.0",
//!   "name": "Email",
//!   "author": "did:ugra:abc",
//!   "authored": "2021-03-01T12:00:00Z",
//!   "schema": { "$schema": "http://json-schema.org/draft-07/schema#", … }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ugra_core::Did;

use crate::error::SchemaError;
use crate::json_schema::JsonSchema;
use crate::version::{generate_schema_id, is_schema_id, new_resource_id, SchemaId, Version};

/// The `type` of a credential schema record.
pub const SCHEMA_RECORD_TYPE: &str =
    "https://w3c-ccg.github.io/vc-json-schemas/schema/1.0/schema.json";

/// Identifying metadata of a schema record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    #[serde(rename = "type")]
    pub record_type: String,
    pub version: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Did>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "ugra_core::marshal::null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub proof: Vec<Value>,
}

/// A credential schema record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(flatten)]
    pub metadata: SchemaMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<JsonSchema>,
}

impl Schema {
    /// A first version (`1.0`) of a new schema by `author`, with a fresh
    /// resource ID, authored now.
    pub fn new(author: Did, name: impl Into<String>, schema: JsonSchema) -> Self {
        let version = Version::INITIAL;
        Self {
            metadata: SchemaMetadata {
                record_type: SCHEMA_RECORD_TYPE.to_string(),
                version: version.to_string(),
                id: generate_schema_id(&author, &new_resource_id(), &version),
                name: name.into(),
                author: Some(author),
                authored: Some(Utc::now()),
                proof: Vec::new(),
            },
            schema: Some(schema),
        }
    }

    /// The successor record: same author and resource ID, the given version
    /// and body, authored now.
    ///
    /// # Errors
    ///
    /// Fails if this record's ID does not parse.
    pub fn revise(&self, version: Version, schema: JsonSchema) -> Result<Self, SchemaError> {
        let id = self.schema_id()?.with_version(version);
        Ok(Self {
            metadata: SchemaMetadata {
                version: version.to_string(),
                id: id.to_string(),
                authored: Some(Utc::now()),
                proof: Vec::new(),
                ..self.metadata.clone()
            },
            schema: Some(schema),
        })
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn author(&self) -> Option<&Did> {
        self.metadata.author.as_ref()
    }

    /// The parsed `version` member.
    pub fn version(&self) -> Result<Version, SchemaError> {
        Version::parse(&self.metadata.version)
    }

    /// The parsed `id` member.
    pub fn schema_id(&self) -> Result<SchemaId, SchemaError> {
        SchemaId::parse(&self.metadata.id)
    }

    /// Check that `id` has schema ID shape.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnrecognizedIdFormat`] otherwise.
    pub fn validate_id(&self) -> Result<(), SchemaError> {
        if is_schema_id(&self.metadata.id) {
            Ok(())
        } else {
            Err(SchemaError::UnrecognizedIdFormat(self.metadata.id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_schema::PrimitiveType;
    use serde_json::json;

    fn author() -> Did {
        Did::new("did:ugra:abcdefghi").unwrap()
    }

    #[test]
    fn test_new_schema_has_valid_id() {
        let schema = Schema::new(author(), "Email", JsonSchema::of_type(PrimitiveType::Object));
        schema.validate_id().unwrap();
        assert_eq!(schema.version().unwrap(), Version::INITIAL);
        let id = schema.schema_id().unwrap();
        assert_eq!(id.author(), &author());
        assert_eq!(id.version(), Version::INITIAL);
    }

    #[test]
    fn test_revise_keeps_resource_id() {
        let first = Schema::new(author(), "Email", JsonSchema::default());
        let second = first
            .revise(Version::new(1, 1), JsonSchema::of_type(PrimitiveType::Object))
            .unwrap();
        assert_eq!(
            first.schema_id().unwrap().resource_id(),
            second.schema_id().unwrap().resource_id()
        );
        assert_eq!(second.metadata.version, "1.1");
        assert!(second.id().ends_with(";version=1.1"));
        assert_eq!(second.author(), first.author());
    }

    #[test]
    fn test_validate_id_rejects() {
        let mut schema = Schema::new(author(), "Email", JsonSchema::default());
        schema.metadata.id = "did:ugra:abc;schema=1;version=1.0".to_string();
        assert!(matches!(
            schema.validate_id(),
            Err(SchemaError::UnrecognizedIdFormat(_))
        ));
    }

    #[test]
    fn test_wire_format_flattens_metadata() {
        let raw = json!({
            "type": SCHEMA_RECORD_TYPE,
            "version": "1.0",
            "id": "did:ugra:abcdefghi;id=abc;version=1.0",
            "name": "Email",
            "author": "did:ugra:abcdefghi",
            "authored": "2021-03-01T12:00:00Z",
            "schema": {
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": "object",
                "properties": {"email": {"type": "string", "format": "email"}},
                "additionalProperties": false
            }
        });
        let schema: Schema = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(schema.name(), "Email");
        assert!(schema.schema.as_ref().unwrap().property("email").is_some());
        assert_eq!(serde_json::to_value(&schema).unwrap(), raw);
    }

    #[test]
    fn test_missing_body_and_author_decode() {
        let schema: Schema = serde_json::from_value(json!({
            "type": SCHEMA_RECORD_TYPE,
            "version": "1.0",
            "id": "did:ugra:abcdefghi;id=abc;version=1.0"
        }))
        .unwrap();
        assert!(schema.schema.is_none());
        assert!(schema.author().is_none());
    }

    #[test]
    fn test_null_proof_decodes_as_empty() {
        let raw = json!({
            "type": SCHEMA_RECORD_TYPE,
            "version": "1.0",
            "id": "did:ugra:abcdefghi;id=abc;version=1.0",
            "author": "did:ugra:abcdefghi",
            "proof": null,
            "schema": {"type": "object"}
        });
        let schema: Schema = serde_json::from_value(raw).unwrap();
        assert!(schema.metadata.proof.is_empty());
        assert!(serde_json::to_value(&schema).unwrap().get("proof").is_none());
    }
}
