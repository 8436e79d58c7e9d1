//! # Schema Builder
//!
//! Compiles a flat, ordered list of named and typed attributes into a
//! draft-07 object schema:
//!
//! ```json
//! {
//!   "$schema": "http://json-schema.org/draft-07/schema#",
//!   "title": "<name>",
//!   "description": "<description>",
//!   "type": "object",
//!   "properties": { … },
//!   "required": [ … ],
//!   "additionalProperties": false
//! }
//! ```
//!
//! `required` is omitted when no attribute is required. Object attributes
//! compile recursively with the same rules. The finished document is checked
//! against the draft-07 meta-schema before it is returned.
//!
//! A builder can also be read from a JSON or YAML descriptor:
//!
//! ```yaml
//! name: Person
//! description: A natural person
//! additionalProperties: false
//! attributes:
//!   - { name: email, type: string, format: email, required: true }
//!   - { name: age, type: number, minimum: 0 }
//!   - { name: tags, type: array, items: { type: string } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::SchemaError;
use crate::json_schema::{
    AdditionalProperties, Items, JsonSchema, PrimitiveType, TypeSet, DRAFT7_SCHEMA,
};
use crate::validate::validate_json_schema;

/// The kind of a builder attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    String,
    Number,
    Object,
    Array,
    Boolean,
    /// Anything else; rejected by [`Builder::build`].
    Other(String),
}

impl AttributeType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Object => "object",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Other(name) => name,
        }
    }

    fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Self::String => Some(PrimitiveType::String),
            Self::Number => Some(PrimitiveType::Number),
            Self::Object => Some(PrimitiveType::Object),
            Self::Array => Some(PrimitiveType::Array),
            Self::Boolean => Some(PrimitiveType::Boolean),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for AttributeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "object" => Self::Object,
            "array" => Self::Array,
            "boolean" => Self::Boolean,
            _ => Self::Other(value),
        }
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        match value {
            AttributeType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// A string `format`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormatType {
    Date,
    Time,
    DateTime,
    Email,
    /// Any other draft-07 format name, passed through.
    Other(String),
}

impl FormatType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::Email => "email",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for FormatType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "date" => Self::Date,
            "time" => Self::Time,
            "date-time" => Self::DateTime,
            "email" => Self::Email,
            _ => Self::Other(value),
        }
    }
}

impl From<FormatType> for String {
    fn from(value: FormatType) -> Self {
        match value {
            FormatType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Numeric bounds for number attributes and number array items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
}

impl NumberConstraints {
    fn apply(&self, attribute: &str, schema: &mut JsonSchema) -> Result<(), SchemaError> {
        let bound = |value: Option<f64>, keyword: &'static str| {
            value
                .map(|v| {
                    Number::from_f64(v).ok_or_else(|| SchemaError::NonFiniteBound {
                        attribute: attribute.to_string(),
                        keyword,
                    })
                })
                .transpose()
        };
        schema.minimum = bound(self.minimum, "minimum")?;
        schema.maximum = bound(self.maximum, "maximum")?;
        schema.exclusive_minimum = bound(self.exclusive_minimum, "exclusiveMinimum")?;
        schema.exclusive_maximum = bound(self.exclusive_maximum, "exclusiveMaximum")?;
        Ok(())
    }
}

/// The element type of an array attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayItems {
    #[serde(rename = "type")]
    pub item_type: AttributeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatType>,
    #[serde(flatten)]
    pub number: NumberConstraints,
}

/// One named attribute of a schema under construction.
///
/// Which constraint members apply depends on `attribute_type`: `format` for
/// strings, the numeric bounds for numbers, `properties` and
/// `additional_properties` for objects, `items` for arrays. Members that do
/// not apply are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatType>,
    #[serde(flatten)]
    pub number: NumberConstraints,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Attribute>,
    #[serde(default)]
    pub additional_properties: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ArrayItems>,
}

impl Attribute {
    fn of(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            required: false,
            format: None,
            number: NumberConstraints::default(),
            properties: Vec::new(),
            additional_properties: false,
            items: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::of(name, AttributeType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::of(name, AttributeType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::of(name, AttributeType::Boolean)
    }

    /// An object attribute with nested attributes.
    pub fn object(name: impl Into<String>, properties: Vec<Attribute>) -> Self {
        Self {
            properties,
            ..Self::of(name, AttributeType::Object)
        }
    }

    /// An array attribute whose elements are `item_type`.
    pub fn array(name: impl Into<String>, item_type: AttributeType) -> Self {
        Self {
            items: Some(ArrayItems {
                item_type,
                format: None,
                number: NumberConstraints::default(),
            }),
            ..Self::of(name, AttributeType::Array)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_format(mut self, format: FormatType) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_bounds(mut self, number: NumberConstraints) -> Self {
        self.number = number;
        self
    }

    pub fn allow_additional_properties(mut self) -> Self {
        self.additional_properties = true;
        self
    }

    fn compile(&self) -> Result<JsonSchema, SchemaError> {
        let primitive = self.attribute_type.primitive().ok_or_else(|| {
            SchemaError::UnknownAttributeType {
                attribute: self.name.clone(),
                attribute_type: self.attribute_type.as_str().to_string(),
            }
        })?;
        let mut schema = JsonSchema::of_type(primitive);

        match self.attribute_type {
            AttributeType::String => {
                schema.format = self.format.as_ref().map(|f| f.as_str().to_string());
            }
            AttributeType::Number => self.number.apply(&self.name, &mut schema)?,
            AttributeType::Object => {
                let (properties, required) = compile_properties(&self.properties)?;
                schema.properties = Some(properties);
                schema.required = required;
                schema.additional_properties =
                    Some(AdditionalProperties::Allowed(self.additional_properties));
            }
            AttributeType::Array => {
                let items = self
                    .items
                    .as_ref()
                    .ok_or_else(|| SchemaError::MissingItemType(self.name.clone()))?;
                schema.items = Some(Items::Single(Box::new(compile_items(&self.name, items)?)));
            }
            AttributeType::Boolean | AttributeType::Other(_) => {}
        }

        tracing::debug!(
            attribute = %self.name,
            attribute_type = %self.attribute_type.as_str(),
            required = self.required,
            "compiled schema attribute"
        );
        Ok(schema)
    }
}

fn compile_items(attribute: &str, items: &ArrayItems) -> Result<JsonSchema, SchemaError> {
    let primitive =
        items
            .item_type
            .primitive()
            .ok_or_else(|| SchemaError::UnknownAttributeType {
                attribute: attribute.to_string(),
                attribute_type: items.item_type.as_str().to_string(),
            })?;
    let mut schema = JsonSchema::of_type(primitive);
    match items.item_type {
        AttributeType::String => {
            schema.format = items.format.as_ref().map(|f| f.as_str().to_string());
        }
        AttributeType::Number => items.number.apply(attribute, &mut schema)?,
        _ => {}
    }
    Ok(schema)
}

fn compile_properties(
    attributes: &[Attribute],
) -> Result<(BTreeMap<String, JsonSchema>, Vec<String>), SchemaError> {
    let mut properties = BTreeMap::new();
    let mut required = Vec::new();

    for attribute in attributes {
        if properties.contains_key(&attribute.name) {
            return Err(SchemaError::DuplicateAttribute(attribute.name.clone()));
        }
        properties.insert(attribute.name.clone(), attribute.compile()?);
        if attribute.required {
            required.push(attribute.name.clone());
        }
    }

    Ok((properties, required))
}

/// Builds a draft-07 object schema from named attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Builder {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub additional_properties: bool,
    pub attributes: Vec<Attribute>,
}

impl Builder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = allowed;
        self
    }

    /// Compile the attributes and meta-validate the result.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::IncompleteBuilder`] if the name, description or
    ///   attribute list is empty.
    /// - [`SchemaError::DuplicateAttribute`] if two attributes at one level
    ///   share a name.
    /// - [`SchemaError::UnknownAttributeType`] for an unsupported kind.
    /// - [`SchemaError::MissingItemType`] for an array attribute without items.
    /// - [`SchemaError::SchemaValidationFailed`] if the compiled document is
    ///   not a valid draft-07 schema.
    pub fn build(&self) -> Result<JsonSchema, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::IncompleteBuilder("name"));
        }
        if self.description.is_empty() {
            return Err(SchemaError::IncompleteBuilder("description"));
        }
        if self.attributes.is_empty() {
            return Err(SchemaError::IncompleteBuilder("attributes"));
        }

        let (properties, required) = compile_properties(&self.attributes)?;
        let schema = JsonSchema {
            schema_uri: Some(DRAFT7_SCHEMA.to_string()),
            title: Some(self.name.clone()),
            description: Some(self.description.clone()),
            schema_type: Some(TypeSet::Single(PrimitiveType::Object)),
            properties: Some(properties),
            required,
            additional_properties: Some(AdditionalProperties::Allowed(self.additional_properties)),
            ..JsonSchema::default()
        };

        validate_json_schema(&schema)?;
        tracing::debug!(
            name = %self.name,
            attributes = self.attributes.len(),
            "built credential schema"
        );
        Ok(schema)
    }
}
