//! # Schema Evolution
//!
//! Compares a published credential schema with a proposed successor and
//! classifies the update as breaking (major) or backward-compatible (minor),
//! then derives the successor's version.
//!
//! ## Rules
//!
//! Major:
//! - a property was removed
//! - a property's `type` or `format` changed
//! - a previously required property is no longer required
//! - `additionalProperties` went from `true` to `false`
//!
//! Minor:
//! - `additionalProperties` went from `false` to `true`
//! - a property was added
//! - the record `name` changed
//! - the schema `description` changed
//! - a property became required
//!
//! Every rule is evaluated; none short-circuits. A major change bumps the
//! major version and resets minor; otherwise minor is bumped. An update
//! with no change at all is rejected.

use serde::Serialize;

use crate::error::{SchemaError, UpdateRejection};
use crate::json_schema::{JsonSchema, PrimitiveType};
use crate::record::Schema;

const UPDATED_MISSING: &str = "Updated Schema is missing from input";
const PREVIOUS_MISSING: &str = "Previous Schema is missing from input";
const AUTHOR_INVALID: &str = "Schema Author is invalid";

/// A previous schema and its proposed successor. Either may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateInput<'a> {
    pub previous: Option<&'a Schema>,
    pub updated: Option<&'a Schema>,
}

impl<'a> UpdateInput<'a> {
    pub fn new(previous: &'a Schema, updated: &'a Schema) -> Self {
        Self {
            previous: Some(previous),
            updated: Some(updated),
        }
    }
}

/// One detected difference between two schema versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum SchemaChange {
    PropertyRemoved {
        property: String,
    },
    PropertyTypeChanged {
        property: String,
        previous: Vec<PrimitiveType>,
        updated: Vec<PrimitiveType>,
    },
    PropertyFormatChanged {
        property: String,
        previous: Option<String>,
        updated: Option<String>,
    },
    RequiredBecameOptional {
        property: String,
    },
    AdditionalPropertiesDisallowed,
    AdditionalPropertiesAllowed,
    PropertyAdded {
        property: String,
    },
    NameChanged {
        previous: String,
        updated: String,
    },
    DescriptionChanged {
        previous: String,
        updated: String,
    },
    RequiredPropertyAdded {
        property: String,
    },
}

impl SchemaChange {
    /// True for breaking changes.
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            Self::PropertyRemoved { .. }
                | Self::PropertyTypeChanged { .. }
                | Self::PropertyFormatChanged { .. }
                | Self::RequiredBecameOptional { .. }
                | Self::AdditionalPropertiesDisallowed
        )
    }
}

/// The outcome of analysing an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub valid: bool,
    pub major_change: bool,
    pub minor_change: bool,
    /// The successor's version, set only when `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_version: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Every detected difference, major rules first.
    pub changes: Vec<SchemaChange>,
}

fn reject(result: UpdateResult, error: SchemaError) -> UpdateRejection {
    let result = UpdateResult {
        valid: false,
        message: error.to_string(),
        ..result
    };
    tracing::warn!(reason = %result.message, "schema update rejected");
    UpdateRejection { result, error }
}

/// Classify the update from `input.previous` to `input.updated` and derive
/// the successor's version from the previous record's `version`.
///
/// # Errors
///
/// Returns an [`UpdateRejection`] whose result has `valid == false` when:
/// - either schema, or its body, is missing, or the updated author is
///   missing or differs from the previous author
///   ([`SchemaError::InvalidUpdateInput`]; no rule runs);
/// - no rule fires ([`SchemaError::NoChangeDetected`]);
/// - the previous version does not parse
///   ([`SchemaError::UnrecognizedVersionFormat`]);
/// - the previous `version` member differs from the version in its `id`
///   ([`SchemaError::VersionMismatch`]).
pub fn validate_schema_update(input: &UpdateInput<'_>) -> Result<UpdateResult, UpdateRejection> {
    let precondition = |message: &str| {
        reject(
            UpdateResult::default(),
            SchemaError::InvalidUpdateInput(message.to_string()),
        )
    };

    let updated = input.updated.ok_or_else(|| precondition(UPDATED_MISSING))?;
    let updated_body = updated
        .schema
        .as_ref()
        .ok_or_else(|| precondition(UPDATED_MISSING))?;
    let previous = input.previous.ok_or_else(|| precondition(PREVIOUS_MISSING))?;
    let previous_body = previous
        .schema
        .as_ref()
        .ok_or_else(|| precondition(PREVIOUS_MISSING))?;
    match (updated.author(), previous.author()) {
        (Some(updated_author), Some(previous_author)) if updated_author == previous_author => {}
        _ => return Err(precondition(AUTHOR_INVALID)),
    }

    let mut changes = Vec::new();
    edited_or_removed_properties(previous_body, updated_body, &mut changes);
    required_became_optional(previous_body, updated_body, &mut changes);
    additional_properties_changes(previous_body, updated_body, &mut changes);
    added_properties(previous_body, updated_body, &mut changes);
    if updated.name() != previous.name() {
        changes.push(SchemaChange::NameChanged {
            previous: previous.name().to_string(),
            updated: updated.name().to_string(),
        });
    }
    if updated_body.description() != previous_body.description() {
        changes.push(SchemaChange::DescriptionChanged {
            previous: previous_body.description().to_string(),
            updated: updated_body.description().to_string(),
        });
    }
    new_required_properties(previous_body, updated_body, &mut changes);

    for change in &changes {
        tracing::debug!(?change, major = change.is_major(), "schema change detected");
    }

    let result = UpdateResult {
        major_change: changes.iter().any(SchemaChange::is_major),
        minor_change: changes.iter().any(|c| !c.is_major()),
        changes,
        ..UpdateResult::default()
    };

    if !result.major_change && !result.minor_change {
        return Err(reject(result, SchemaError::NoChangeDetected));
    }

    let previous_version = match previous.version() {
        Ok(version) => version,
        Err(error) => return Err(reject(result, error)),
    };
    match previous.schema_id() {
        Ok(id) if id.version() != previous_version => {
            let error = SchemaError::VersionMismatch {
                version: previous_version.to_string(),
                id_version: id.version().to_string(),
            };
            return Err(reject(result, error));
        }
        Ok(_) => {}
        Err(error) => {
            tracing::warn!(id = previous.id(), %error, "previous schema id carries no version");
        }
    }
    let derived = if result.major_change {
        previous_version.increment_major()
    } else {
        previous_version.increment_minor()
    };

    tracing::debug!(
        previous = %previous_version,
        derived = %derived,
        major = result.major_change,
        "derived schema version"
    );
    Ok(UpdateResult {
        valid: true,
        derived_version: Some(derived.to_string()),
        message: format!(
            "{} update: {previous_version} -> {derived}",
            if result.major_change { "major" } else { "minor" }
        ),
        ..result
    })
}

fn edited_or_removed_properties(
    previous: &JsonSchema,
    updated: &JsonSchema,
    changes: &mut Vec<SchemaChange>,
) {
    let Some(previous_properties) = previous.properties.as_ref() else {
        return;
    };
    for (name, before) in previous_properties {
        let Some(after) = updated.property(name) else {
            changes.push(SchemaChange::PropertyRemoved {
                property: name.clone(),
            });
            continue;
        };
        if before.types() != after.types() {
            changes.push(SchemaChange::PropertyTypeChanged {
                property: name.clone(),
                previous: before.types().to_vec(),
                updated: after.types().to_vec(),
            });
        }
        if before.format != after.format {
            changes.push(SchemaChange::PropertyFormatChanged {
                property: name.clone(),
                previous: before.format.clone(),
                updated: after.format.clone(),
            });
        }
    }
}

fn required_became_optional(
    previous: &JsonSchema,
    updated: &JsonSchema,
    changes: &mut Vec<SchemaChange>,
) {
    changes.extend(
        previous
            .required_fields()
            .iter()
            .filter(|field| !updated.is_required(field))
            .map(|field| SchemaChange::RequiredBecameOptional {
                property: field.clone(),
            }),
    );
}

fn additional_properties_changes(
    previous: &JsonSchema,
    updated: &JsonSchema,
    changes: &mut Vec<SchemaChange>,
) {
    match (
        previous.allows_additional_properties(),
        updated.allows_additional_properties(),
    ) {
        (true, false) => changes.push(SchemaChange::AdditionalPropertiesDisallowed),
        (false, true) => changes.push(SchemaChange::AdditionalPropertiesAllowed),
        _ => {}
    }
}

fn added_properties(previous: &JsonSchema, updated: &JsonSchema, changes: &mut Vec<SchemaChange>) {
    changes.extend(
        updated
            .property_names()
            .filter(|name| previous.property(name).is_none())
            .map(|name| SchemaChange::PropertyAdded {
                property: name.to_string(),
            }),
    );
}

fn new_required_properties(
    previous: &JsonSchema,
    updated: &JsonSchema,
    changes: &mut Vec<SchemaChange>,
) {
    changes.extend(
        updated
            .required_fields()
            .iter()
            .filter(|field| !previous.is_required(field))
            .map(|field| SchemaChange::RequiredPropertyAdded {
                property: field.clone(),
            }),
    );
}
