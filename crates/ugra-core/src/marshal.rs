//! # Flexible-Arity Normalization
//!
//! DID documents and Verifiable Credentials allow several members to be
//! written either as a single value or as an array of values. Typed decoding
//! wants exactly one shape, so documents pass through an ordered list of
//! [`Normalizer`]s on the generic JSON tree before (or after) the typed
//! `serde` stage.
//!
//! ## Pipeline
//!
//! 1. Parse the input into a `serde_json::Map`. Anything other than a JSON
//!    object is rejected with [`MarshalError::MalformedDocument`].
//! 2. Apply each normalizer left to right. Order is caller-specified and
//!    significant; no normalizer assumes another has or has not run.
//! 3. Re-serialize (or hand the tree to `serde_json::from_value`).
//!
//! Normalizers only look at top-level keys. Nested documents (e.g. the
//! `serviceEndpoint` of each DID service) are normalized by running a
//! pipeline on the nested object.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::MarshalError;

/// A single in-place transformation of a top-level JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalizer {
    /// Rename `alias` to `target`. When both keys are present the alias
    /// value overwrites the target.
    KeyAlias {
        /// The key to rename.
        alias: String,
        /// The key it is renamed to.
        target: String,
    },
    /// Wrap a present, non-array value in a single-element array.
    Plural(String),
    /// Collapse an array of exactly one element to that element.
    Unplural(String),
    /// Like [`Normalizer::Plural`], but objects are left as objects.
    PluralValueOrMap(String),
}

impl Normalizer {
    /// Normalizer converting an aliased key to its canonical form,
    /// e.g. `publicKey` to `verificationMethod` for legacy DID documents.
    pub fn key_alias(alias: impl Into<String>, target: impl Into<String>) -> Self {
        Self::KeyAlias {
            alias: alias.into(),
            target: target.into(),
        }
    }

    /// Normalizer turning a singular value into an array.
    ///
    /// `{"message": "Hello"}` becomes `{"message": ["Hello"]}`.
    pub fn plural(key: impl Into<String>) -> Self {
        Self::Plural(key.into())
    }

    /// Normalizer turning a one-element array into a singular value.
    pub fn unplural(key: impl Into<String>) -> Self {
        Self::Unplural(key.into())
    }

    /// Normalizer turning a singular value into an array unless it is an object.
    pub fn plural_value_or_map(key: impl Into<String>) -> Self {
        Self::PluralValueOrMap(key.into())
    }

    /// Apply this normalizer to `doc` in place.
    pub fn apply(&self, doc: &mut Map<String, Value>) {
        match self {
            Self::KeyAlias { alias, target } => {
                if let Some(value) = doc.remove(alias) {
                    doc.insert(target.clone(), value);
                }
            }
            Self::Plural(key) => {
                if let Some(value) = doc.get_mut(key) {
                    if !value.is_null() && !value.is_array() {
                        let single = value.take();
                        *value = Value::Array(vec![single]);
                    }
                }
            }
            Self::Unplural(key) => {
                if let Some(value) = doc.get_mut(key) {
                    if let Value::Array(items) = value {
                        if items.len() == 1 {
                            let single = items.remove(0);
                            *value = single;
                        }
                    }
                }
            }
            Self::PluralValueOrMap(key) => {
                if let Some(value) = doc.get_mut(key) {
                    if !value.is_null() && !value.is_array() && !value.is_object() {
                        let single = value.take();
                        *value = Value::Array(vec![single]);
                    }
                }
            }
        }
    }
}

/// Run `normalizers` in order over an already-parsed JSON value.
///
/// This is the tree-stage entry point used by typed `Serialize` /
/// `Deserialize` implementations.
///
/// # Errors
///
/// Returns [`MarshalError::MalformedDocument`] if `value` is not an object.
pub fn normalize_value(value: Value, normalizers: &[Normalizer]) -> Result<Value, MarshalError> {
    let mut doc = match value {
        Value::Object(map) => map,
        other => {
            return Err(MarshalError::MalformedDocument(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };
    for normalizer in normalizers {
        tracing::trace!(?normalizer, "applying normalizer");
        normalizer.apply(&mut doc);
    }
    Ok(Value::Object(doc))
}

/// Parse `document`, apply `normalizers` in order, and re-serialize.
///
/// # Errors
///
/// Returns [`MarshalError::MalformedDocument`] if `document` is not valid
/// JSON or not a JSON object.
pub fn normalize_document(
    document: &[u8],
    normalizers: &[Normalizer],
) -> Result<Vec<u8>, MarshalError> {
    let value: Value = serde_json::from_slice(document)
        .map_err(|e| MarshalError::MalformedDocument(e.to_string()))?;
    let normalized = normalize_value(value, normalizers)?;
    Ok(serde_json::to_vec(&normalized)?)
}

/// `deserialize_with` helper for set-valued members that may be written as
/// `null`: a `null` (or absent, with `#[serde(default)]`) member decodes to
/// an empty list.
///
/// `Plural` leaves `null` untouched, so this runs after the normalizers.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Singular (non-array, non-null) JSON scalars.
    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9:/._ -]{0,40}".prop_map(Value::String),
        ]
    }

    proptest! {
        /// `Unplural(Plural(x)) == x` for any singular scalar.
        #[test]
        fn unplural_inverts_plural(x in scalar()) {
            let mut doc = Map::new();
            doc.insert("k".to_string(), x.clone());
            Normalizer::plural("k").apply(&mut doc);
            Normalizer::unplural("k").apply(&mut doc);
            prop_assert_eq!(doc.get("k"), Some(&x));
        }

        /// `Plural(Unplural([a])) == [a]`.
        #[test]
        fn plural_inverts_unplural(x in scalar()) {
            let original = Value::Array(vec![x]);
            let mut doc = Map::new();
            doc.insert("k".to_string(), original.clone());
            Normalizer::unplural("k").apply(&mut doc);
            Normalizer::plural("k").apply(&mut doc);
            prop_assert_eq!(doc.get("k"), Some(&original));
        }

        /// Plural is idempotent.
        #[test]
        fn plural_is_idempotent(x in scalar()) {
            let mut once = Map::new();
            once.insert("k".to_string(), x);
            Normalizer::plural("k").apply(&mut once);
            let mut twice = once.clone();
            Normalizer::plural("k").apply(&mut twice);
            prop_assert_eq!(once, twice);
        }
    }
}
