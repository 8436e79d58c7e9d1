//! # Draft-07 JSON Schema Document
//!
//! A typed model of the JSON Schema draft-07 vocabulary
//! (<https://json-schema.org/draft-07/json-schema-validation>). Every member
//! is optional. Four members are unions whose JSON shape decides the variant:
//!
//! | Member | JSON shape → variant |
//! |---|---|
//! | `additionalProperties` | boolean → [`AdditionalProperties::Allowed`], otherwise [`AdditionalProperties::Schema`] |
//! | `items` | array → [`Items::Tuple`], otherwise [`Items::Single`] |
//! | `dependencies` (per key) | array → [`Dependency::Required`], otherwise [`Dependency::Schema`] |
//! | `type` | array → [`TypeSet::Multiple`], otherwise [`TypeSet::Single`] |
//!
//! Encoding writes back exactly the variant held, except that a
//! one-element [`TypeSet::Multiple`] is written as a bare string.
//!
//! Boolean schemas (`"items": true`) are not part of this model.
//! Keywords outside draft-07 are dropped on decode.

use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// The draft-07 meta-schema URI, written to `$schema` by the builder.
pub const DRAFT7_SCHEMA: &str = "http://json-schema.org/draft-07/schema#";

/// A JSON Schema draft-07 document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(rename = "$comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Box<JsonSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<JsonSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<JsonSchema>,
    /// `const`; a JSON `null` reads as absent.
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<Box<JsonSchema>>,
    /// `default`; a JSON `null` reads as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<BTreeMap<String, JsonSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, Dependency>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
    pub else_schema: Option<Box<JsonSchema>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enumeration: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub if_schema: Option<Box<JsonSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<JsonSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<JsonSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<BTreeMap<String, JsonSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, JsonSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Box<JsonSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "then", default, skip_serializing_if = "Option::is_none")]
    pub then_schema: Option<Box<JsonSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
}

impl JsonSchema {
    /// A schema with only `type` set.
    pub fn of_type(primitive: PrimitiveType) -> Self {
        Self {
            schema_type: Some(TypeSet::Single(primitive)),
            ..Self::default()
        }
    }

    /// Look up a property schema by name.
    pub fn property(&self, name: &str) -> Option<&JsonSchema> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Names of the declared properties, sorted.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .flat_map(|props| props.keys().map(String::as_str))
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|field| field == name)
    }

    /// True only for an explicit `"additionalProperties": true`. An absent
    /// member or a sub-schema counts as not allowed.
    pub fn allows_additional_properties(&self) -> bool {
        matches!(
            self.additional_properties,
            Some(AdditionalProperties::Allowed(true))
        )
    }

    /// The description, or `""` when absent.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// The declared primitive types; empty when `type` is absent.
    pub fn types(&self) -> &[PrimitiveType] {
        self.schema_type.as_ref().map(TypeSet::types).unwrap_or_default()
    }
}

/// A draft-07 primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Number => "number",
            Self::String => "string",
            Self::Integer => "integer",
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrimitiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(Self::Null),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            other => Err(format!("invalid primitive type: {other}")),
        }
    }
}

/// `type`: one primitive type or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSet {
    Single(PrimitiveType),
    Multiple(Vec<PrimitiveType>),
}

impl TypeSet {
    pub fn types(&self) -> &[PrimitiveType] {
        match self {
            Self::Single(primitive) => std::slice::from_ref(primitive),
            Self::Multiple(primitives) => primitives,
        }
    }

    pub fn contains(&self, primitive: PrimitiveType) -> bool {
        self.types().contains(&primitive)
    }
}

impl Serialize for TypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.types() {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TypeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .iter()
                .map(parse_primitive)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Multiple)
                .map_err(de::Error::custom),
            other => parse_primitive(&other)
                .map(Self::Single)
                .map_err(de::Error::custom),
        }
    }
}

fn parse_primitive(value: &Value) -> Result<PrimitiveType, String> {
    match value {
        Value::String(name) => name.parse(),
        other => Err(format!(
            "failed to parse primitive types list: expected a string, got {other}"
        )),
    }
}

/// `additionalProperties`: a sub-schema or a boolean switch.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Schema(Box<JsonSchema>),
    Allowed(bool),
}

impl Serialize for AdditionalProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Schema(schema) => schema.serialize(serializer),
            Self::Allowed(allowed) => serializer.serialize_bool(*allowed),
        }
    }
}

impl<'de> Deserialize<'de> for AdditionalProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(allowed) => Ok(Self::Allowed(allowed)),
            other => decode_schema(other).map(Self::Schema),
        }
    }
}

/// `items`: one schema for every element, or one per position.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    Single(Box<JsonSchema>),
    Tuple(Vec<JsonSchema>),
}

impl Serialize for Items {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(schema) => schema.serialize(serializer),
            Self::Tuple(schemas) => schemas.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            list @ Value::Array(_) => Vec::<JsonSchema>::deserialize(list)
                .map(Self::Tuple)
                .map_err(de::Error::custom),
            other => decode_schema(other).map(Self::Single),
        }
    }
}

/// One `dependencies` entry: a schema the instance must also satisfy, or
/// property names that must also be present.
#[derive(Debug, Clone, PartialEq)]
pub enum Dependency {
    Schema(Box<JsonSchema>),
    Required(Vec<String>),
}

impl Serialize for Dependency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Schema(schema) => schema.serialize(serializer),
            Self::Required(names) => names.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Dependency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            list @ Value::Array(_) => Vec::<String>::deserialize(list)
                .map(Self::Required)
                .map_err(de::Error::custom),
            other => decode_schema(other).map(Self::Schema),
        }
    }
}

fn decode_schema<E: de::Error>(value: Value) -> Result<Box<JsonSchema>, E> {
    JsonSchema::deserialize(value)
        .map(Box::new)
        .map_err(|e| E::custom(format!("failed to unmarshal JSON Schema: {e}")))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn primitive() -> impl Strategy<Value = PrimitiveType> {
        prop_oneof![
            Just(PrimitiveType::Null),
            Just(PrimitiveType::Boolean),
            Just(PrimitiveType::Object),
            Just(PrimitiveType::Array),
            Just(PrimitiveType::Number),
            Just(PrimitiveType::String),
            Just(PrimitiveType::Integer),
        ]
    }

    fn leaf() -> impl Strategy<Value = JsonSchema> {
        (
            proptest::option::of(primitive()),
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of(0u64..100),
        )
            .prop_map(|(primitive, description, max_length)| JsonSchema {
                schema_type: primitive.map(TypeSet::Single),
                description,
                max_length,
                ..JsonSchema::default()
            })
    }

    fn schema() -> impl Strategy<Value = JsonSchema> {
        leaf().prop_recursive(3, 16, 4, |inner| {
            (
                proptest::option::of(prop_oneof![
                    any::<bool>().prop_map(AdditionalProperties::Allowed),
                    inner.clone().prop_map(|s| AdditionalProperties::Schema(Box::new(s))),
                ]),
                proptest::option::of(prop_oneof![
                    inner.clone().prop_map(|s| Items::Single(Box::new(s))),
                    proptest::collection::vec(inner.clone(), 0..3).prop_map(Items::Tuple),
                ]),
                proptest::option::of(proptest::collection::btree_map(
                    "[a-z]{1,6}",
                    prop_oneof![
                        inner.clone().prop_map(|s| Dependency::Schema(Box::new(s))),
                        proptest::collection::vec("[a-z]{1,6}", 0..3).prop_map(Dependency::Required),
                    ],
                    0..3,
                )),
                proptest::option::of(proptest::collection::vec(primitive(), 2..4)),
            )
                .prop_map(|(additional_properties, items, dependencies, types)| JsonSchema {
                    additional_properties,
                    items,
                    dependencies,
                    schema_type: types.map(TypeSet::Multiple),
                    ..JsonSchema::default()
                })
        })
    }

    proptest! {
        #[test]
        fn codec_round_trip_preserves_variants(schema in schema()) {
            let encoded = serde_json::to_value(&schema).unwrap();
            let decoded: JsonSchema = serde_json::from_value(encoded).unwrap();
            prop_assert_eq!(decoded, schema);
        }
    }
}
