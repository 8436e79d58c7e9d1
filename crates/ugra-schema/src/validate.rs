//! # Schema Validation
//!
//! Runtime validation with the `jsonschema` crate, always as draft-07:
//!
//! - **Meta-validation**: a candidate schema is checked against the
//!   draft-07 meta-schema shipped in `schemas/draft-07.schema.json`, then
//!   compiled to catch what the meta-schema cannot see (bad `$ref`s,
//!   invalid `pattern` regexes).
//! - **Document validation**: a JSON/YAML document is checked against a
//!   schema; every violation is collected, not just the first.
//! - **Credential validation**: each `credentialSubject` of a credential is
//!   checked against the subject schema.
//!
//! Failures carry structured [`Violation`]s with the instance path, the
//! schema path and a message.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use jsonschema::{Draft, Validator};
use serde_json::Value;
use ugra_vc::VerifiableCredential;

use crate::error::SchemaError;
use crate::json_schema::JsonSchema;

static META_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../schemas/draft-07.schema.json"))
        .expect("draft-07 meta-schema should be valid JSON")
});

static META_VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&META_SCHEMA)
        .expect("draft-07 meta-schema should compile")
});

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer to the keyword in the schema that failed.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// The violations of one failed validation, in reporting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl From<Vec<Violation>> for ValidationViolations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

/// Comma-separated, matching the `Invalid schema: a, b` error text.
impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

fn check(validator: &Validator, instance: &Value) -> Result<(), SchemaError> {
    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = violations.len(), "document failed schema validation");
        Err(SchemaError::SchemaValidationFailed(violations.into()))
    }
}

/// Compile `schema` as draft-07. A compile failure is reported as a single
/// root violation.
fn compile(schema: &Value) -> Result<Validator, SchemaError> {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(schema)
        .map_err(|e| {
            SchemaError::SchemaValidationFailed(
                vec![Violation {
                    instance_path: e.instance_path.to_string(),
                    schema_path: e.schema_path.to_string(),
                    message: e.to_string(),
                }]
                .into(),
            )
        })
}

/// Check that a raw JSON value is a valid draft-07 schema.
///
/// # Errors
///
/// Returns [`SchemaError::SchemaValidationFailed`] with the meta-schema
/// violations, or with the compile error.
pub fn validate_json_schema_value(schema: &Value) -> Result<(), SchemaError> {
    check(&META_VALIDATOR, schema)?;
    compile(schema).map(drop)
}

/// Check that a typed schema document is a valid draft-07 schema.
pub fn validate_json_schema(schema: &JsonSchema) -> Result<(), SchemaError> {
    validate_json_schema_value(&serde_json::to_value(schema)?)
}

/// Check that a string is a JSON document and a valid draft-07 schema.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidJson`] if the string does not decode to a
/// schema object, else as [`validate_json_schema_value`].
pub fn validate_json_schema_str(maybe_schema: &str) -> Result<(), SchemaError> {
    let value: Value = serde_json::from_str(maybe_schema).map_err(|e| SchemaError::InvalidJson {
        what: "schema",
        reason: e.to_string(),
    })?;
    serde_json::from_value::<JsonSchema>(value.clone()).map_err(|e| SchemaError::InvalidJson {
        what: "schema",
        reason: e.to_string(),
    })?;
    validate_json_schema_value(&value)
}

/// Validate `document` against `schema`.
pub fn validate_value(schema: &Value, document: &Value) -> Result<(), SchemaError> {
    check(&compile(schema)?, document)
}

/// Validate a JSON document string against a JSON schema string.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidJson`] if either string is not JSON, and
/// [`SchemaError::SchemaValidationFailed`] with every violation otherwise.
pub fn validate(schema: &str, document: &str) -> Result<(), SchemaError> {
    let schema: Value = serde_json::from_str(schema).map_err(|e| SchemaError::InvalidJson {
        what: "schema",
        reason: e.to_string(),
    })?;
    let document: Value = serde_json::from_str(document).map_err(|e| SchemaError::InvalidJson {
        what: "document",
        reason: e.to_string(),
    })?;
    validate_value(&schema, &document)
}

/// Validate every `credentialSubject` of `credential` against
/// `subject_schema`.
pub fn validate_credential(
    subject_schema: &JsonSchema,
    credential: &VerifiableCredential,
) -> Result<(), SchemaError> {
    let validator = compile(&serde_json::to_value(subject_schema)?)?;
    match &credential.credential_subject {
        Value::Array(subjects) => subjects
            .iter()
            .try_for_each(|subject| check(&validator, subject)),
        subject => check(&validator, subject),
    }
}

/// Decode a raw credential and validate its subject against a schema
/// string.
pub fn validate_credential_str(subject_schema: &str, credential: &str) -> Result<(), SchemaError> {
    let schema: JsonSchema =
        serde_json::from_str(subject_schema).map_err(|e| SchemaError::InvalidJson {
            what: "schema",
            reason: e.to_string(),
        })?;
    let credential = VerifiableCredential::from_slice(credential.as_bytes())?;
    validate_credential(&schema, &credential)
}

/// Load a JSON or YAML document, choosing the format by file extension
/// (`.yaml`/`.yml` for YAML, anything else JSON).
///
/// # Errors
///
/// Returns [`SchemaError::DocumentLoad`] if the file cannot be read or
/// parsed.
pub fn load_document(path: &Path) -> Result<Value, SchemaError> {
    let load_error = |reason: String| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| load_error(format!("cannot read file: {e}")))?;

    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| load_error(format!("invalid YAML: {e}"))),
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}

/// Validate the document at `document_path` against `schema`.
pub fn validate_file(schema: &JsonSchema, document_path: &Path) -> Result<(), SchemaError> {
    let document = load_document(document_path)?;
    validate_value(&serde_json::to_value(schema)?, &document)
}

/// True if `input` is a JSON document.
pub fn is_json(input: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 0}
            },
            "required": ["name"],
            "additionalProperties": false
        })
    }

    fn credential(subject: Value) -> VerifiableCredential {
        serde_json::from_value(json!({
            "@context": "https://www.w3.org/2018/credentials/v1",
            "type": "VerifiableCredential",
            "issuer": "did:ugra:issuer",
            "issuanceDate": "2021-03-01T12:00:00Z",
            "credentialSubject": subject
        }))
        .unwrap()
    }

    #[test]
    fn test_meta_schema_compiles() {
        assert!(META_SCHEMA.is_object());
        validate_json_schema_value(&person_schema()).unwrap();
    }

    #[test]
    fn test_meta_validation_rejects_bad_type() {
        let err = validate_json_schema_value(&json!({"type": "text"})).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaValidationFailed(v) if !v.is_empty()));
    }

    #[test]
    fn test_meta_validation_rejects_negative_length() {
        assert!(validate_json_schema_value(&json!({"maxLength": -1})).is_err());
    }

    #[test]
    fn test_validate_json_schema_str() {
        validate_json_schema_str(&person_schema().to_string()).unwrap();
        assert!(matches!(
            validate_json_schema_str("{not json"),
            Err(SchemaError::InvalidJson { what: "schema", .. })
        ));
    }

    #[test]
    fn test_validate_valid_document() {
        validate(
            &person_schema().to_string(),
            r#"{"name": "Alice", "age": 30}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let err = validate(
            &person_schema().to_string(),
            r#"{"age": -1, "extra": true}"#,
        )
        .unwrap_err();
        match err {
            SchemaError::SchemaValidationFailed(violations) => {
                assert!(violations.len() >= 3, "got {violations}");
                let text = violations.to_string();
                assert!(text.contains("name"));
                assert!(err_text_starts_with_invalid_schema(&violations));
            }
            other => panic!("expected SchemaValidationFailed, got {other}"),
        }
    }

    fn err_text_starts_with_invalid_schema(violations: &ValidationViolations) -> bool {
        SchemaError::SchemaValidationFailed(violations.clone())
            .to_string()
            .starts_with("Invalid schema: ")
    }

    #[test]
    fn test_validate_rejects_non_json() {
        assert!(matches!(
            validate("nope", "{}"),
            Err(SchemaError::InvalidJson { what: "schema", .. })
        ));
        assert!(matches!(
            validate("{}", "nope"),
            Err(SchemaError::InvalidJson { what: "document", .. })
        ));
    }

    #[test]
    fn test_validate_credential_subject() {
        let schema: JsonSchema = serde_json::from_value(person_schema()).unwrap();
        validate_credential(&schema, &credential(json!({"name": "Alice"}))).unwrap();
        assert!(validate_credential(&schema, &credential(json!({"age": 3}))).is_err());
    }

    #[test]
    fn test_validate_credential_str() {
        let raw = json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential"],
            "issuer": "did:ugra:issuer",
            "issuanceDate": "2021-03-01T12:00:00Z",
            "credentialSubject": [{"name": "Alice"}]
        });
        validate_credential_str(&person_schema().to_string(), &raw.to_string()).unwrap();
    }

    #[test]
    fn test_is_json() {
        assert!(is_json("{}"));
        assert!(is_json("[1, 2]"));
        assert!(is_json("\"s\""));
        assert!(!is_json("{"));
        assert!(!is_json(""));
    }

    #[test]
    fn test_violation_display() {
        let root = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""name" is a required property"#.to_string(),
        };
        let nested = Violation {
            instance_path: "/age".to_string(),
            schema_path: "/properties/age/minimum".to_string(),
            message: "-1 is less than the minimum of 0".to_string(),
        };
        assert!(root.to_string().starts_with("(root): "));
        let all = ValidationViolations::from(vec![root, nested]);
        assert_eq!(all.to_string().matches(", ").count(), 1);
        assert!(all.to_string().contains("/age: "));
    }

    #[test]
    fn test_load_document_yaml_and_json() {
        let dir = std::env::temp_dir().join(format!("ugra-schema-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let yaml = dir.join("doc.yaml");
        std::fs::write(&yaml, "name: Alice\nage: 30\n").unwrap();
        let json_path = dir.join("doc.json");
        std::fs::write(&json_path, r#"{"name": "Bob"}"#).unwrap();

        assert_eq!(load_document(&yaml).unwrap(), json!({"name": "Alice", "age": 30}));
        let schema: JsonSchema = serde_json::from_value(person_schema()).unwrap();
        validate_file(&schema, &yaml).unwrap();
        validate_file(&schema, &json_path).unwrap();

        assert!(matches!(
            load_document(&dir.join("missing.json")),
            Err(SchemaError::DocumentLoad { .. })
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
