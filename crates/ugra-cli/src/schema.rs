//! # Schema Subcommand
//!
//! Build, check, diff and validate credential schemas.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use serde_json::Value;
use ugra_schema::{
    load_document, validate_json_schema, validate_schema_update, validate_value, Builder,
    JsonSchema, Schema, UpdateInput,
};

use crate::Report;

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// Compile a builder descriptor (.json, .yaml) into a draft-07 schema.
    Build {
        descriptor: PathBuf,
    },
    /// Check a schema (or schema record) against the draft-07 meta-schema.
    Check {
        schema: PathBuf,
    },
    /// Classify the update between two schema records and derive the next version.
    Diff {
        previous: PathBuf,
        updated: PathBuf,
    },
    /// Validate a JSON or YAML document against a schema (or schema record).
    Validate {
        schema: PathBuf,
        document: PathBuf,
    },
}

/// Run a schema subcommand.
pub fn run(args: &SchemaArgs) -> anyhow::Result<Report> {
    match &args.command {
        SchemaCommand::Build { descriptor } => build(descriptor),
        SchemaCommand::Check { schema } => check(schema),
        SchemaCommand::Diff { previous, updated } => diff(previous, updated),
        SchemaCommand::Validate { schema, document } => validate(schema, document),
    }
}

fn build(descriptor: &Path) -> anyhow::Result<Report> {
    let builder: Builder = serde_json::from_value(load_document(descriptor)?)
        .with_context(|| format!("invalid builder descriptor {}", descriptor.display()))?;
    let schema = builder.build()?;
    Ok(Report::ok(serde_json::to_string_pretty(&schema)?))
}

fn check(path: &Path) -> anyhow::Result<Report> {
    let schema = load_schema_body(path)?;
    validate_json_schema(&schema)?;
    Ok(Report::ok(format!("{}: valid draft-07 schema", path.display())))
}

fn diff(previous: &Path, updated: &Path) -> anyhow::Result<Report> {
    let previous = load_record(previous)?;
    let updated = load_record(updated)?;

    match validate_schema_update(&UpdateInput::new(&previous, &updated)) {
        Ok(result) => Ok(Report::ok(serde_json::to_string_pretty(&result)?)),
        Err(rejection) => {
            tracing::warn!(error = %rejection.error, "schema update rejected");
            Ok(Report::failed(serde_json::to_string_pretty(&rejection.result)?))
        }
    }
}

fn validate(schema: &Path, document: &Path) -> anyhow::Result<Report> {
    let schema = serde_json::to_value(load_schema_body(schema)?)?;
    let document_value = load_document(document)?;
    match validate_value(&schema, &document_value) {
        Ok(()) => Ok(Report::ok(format!("{}: valid", document.display()))),
        Err(ugra_schema::SchemaError::SchemaValidationFailed(violations)) => {
            let lines: Vec<String> = violations
                .violations()
                .iter()
                .map(|v| format!("  {v}"))
                .collect();
            Ok(Report::failed(format!(
                "{}: {} violation(s)\n{}",
                document.display(),
                violations.len(),
                lines.join("\n")
            )))
        }
        Err(other) => Err(other.into()),
    }
}

fn load_record(path: &Path) -> anyhow::Result<Schema> {
    serde_json::from_value(load_document(path)?)
        .with_context(|| format!("invalid schema record {}", path.display()))
}

/// A file holding either a bare JSON Schema or a schema record; for a
/// record, its body.
fn load_schema_body(path: &Path) -> anyhow::Result<JsonSchema> {
    let value = load_document(path)?;
    if let Ok(record) = serde_json::from_value::<Schema>(value.clone()) {
        if let Some(body) = record.schema {
            return Ok(body);
        }
    }
    let is_object = matches!(value, Value::Object(_));
    anyhow::ensure!(is_object, "{} is not a JSON Schema object", path.display());
    serde_json::from_value(value).with_context(|| format!("invalid JSON Schema {}", path.display()))
}
