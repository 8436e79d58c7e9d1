//! # ugra-schema — Credential Schemas
//!
//! Credential schemas for the ugradid stack: the JSON Schema documents that
//! constrain `credentialSubject`, the records that publish them, and the
//! rules for evolving them.
//!
//! ## Codec (`json_schema`)
//!
//! [`JsonSchema`] models the draft-07 vocabulary. Members that JSON Schema
//! lets take several shapes (`additionalProperties`, `items`,
//! `dependencies`, `type`) are Rust enums chosen by the JSON shape on decode
//! and written back unchanged on encode.
//!
//! ## Builder (`builder`)
//!
//! [`Builder`] compiles an ordered list of typed [`Attribute`]s into a
//! draft-07 object schema and meta-validates the result.
//!
//! ## Records and IDs (`record`, `version`)
//!
//! [`Schema`] is a published schema: metadata plus body. Its ID is a DID URL
//! `did:ugra:<author>;id=<resource>;version=<major>.<minor>`; [`SchemaId`]
//! and the `extract_*` helpers take it apart.
//!
//! ## Evolution (`evolution`)
//!
//! [`validate_schema_update`] compares two records, classifies the update as
//! major or minor, and derives the next [`Version`].
//!
//! ## Validation (`validate`)
//!
//! Draft-07 validation backed by the `jsonschema` crate: schemas against the
//! meta-schema, documents against schemas, credential subjects against
//! their schema.
//!
//! ## Crate Policy
//!
//! - Depends on `ugra-core` and `ugra-vc` internally.
//! - Schema validation is a trust boundary: invalid documents are rejected
//!   with every violation, each with instance path, schema path and message.

pub mod builder;
pub mod error;
pub mod evolution;
pub mod json_schema;
pub mod record;
pub mod validate;
pub mod version;

pub use builder::{ArrayItems, Attribute, AttributeType, Builder, FormatType, NumberConstraints};
pub use error::{SchemaError, UpdateRejection};
pub use evolution::{validate_schema_update, SchemaChange, UpdateInput, UpdateResult};
pub use json_schema::{
    AdditionalProperties, Dependency, Items, JsonSchema, PrimitiveType, TypeSet, DRAFT7_SCHEMA,
};
pub use record::{Schema, SchemaMetadata, SCHEMA_RECORD_TYPE};
pub use validate::{
    is_json, load_document, validate, validate_credential, validate_credential_str, validate_file,
    validate_json_schema, validate_json_schema_str, validate_json_schema_value, validate_value,
    ValidationViolations, Violation,
};
pub use version::{
    extract_schema_author_did, extract_schema_resource_id, extract_schema_version_from_id,
    generate_schema_id, is_schema_id, new_resource_id, SchemaId, Version,
};
