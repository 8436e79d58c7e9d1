//! # Schema Versions and Identifiers
//!
//! Schema versions are `major.minor` (no patch). A schema ID is a DID URL
//! built from the author's DID with two parameters:
//!
//! ```text
//! did:ugra:<author-id>;id=<resource-id>;version=<major>.<minor>
//! ```
//!
//! Sub-fields are cut at the literal markers `;id=` and `;version=`; the
//! author is everything before `;id=`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ugra_core::Did;

use crate::error::SchemaError;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("should compile"));

static SCHEMA_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(did:(?:ugra):\S+);id=(\S+);version=(\d+\.\d+)$").expect("should compile")
});

const ID_MARKER: &str = ";id=";
const VERSION_MARKER: &str = ";version=";

/// A `major.minor` schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
}

impl Version {
    pub const INITIAL: Self = Self { major: 1, minor: 0 };

    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse `"<major>.<minor>"`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnrecognizedVersionFormat`] for anything else,
    /// including components too large for a `u64`.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        let unrecognized = || SchemaError::UnrecognizedVersionFormat(input.to_string());
        if !VERSION_RE.is_match(input) {
            return Err(unrecognized());
        }
        let (major, minor) = input.split_once('.').ok_or_else(unrecognized)?;
        Ok(Self {
            major: major.parse().map_err(|_| unrecognized())?,
            minor: minor.parse().map_err(|_| unrecognized())?,
        })
    }

    /// Next major version; minor resets to 0.
    pub fn increment_major(self) -> Self {
        Self {
            major: self.major.saturating_add(1),
            minor: 0,
        }
    }

    pub fn increment_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor.saturating_add(1),
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// Build a schema ID: `{author};id={id};version={version}`.
pub fn generate_schema_id(author: &Did, id: &str, version: &Version) -> String {
    format!("{author}{ID_MARKER}{id}{VERSION_MARKER}{version}")
}

/// A fresh resource ID for a new schema: a v4 UUID without hyphens.
pub fn new_resource_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// True if `schema_id` has the `did:ugra:…;id=…;version=M.m` shape.
pub fn is_schema_id(schema_id: &str) -> bool {
    SCHEMA_ID_RE.is_match(schema_id)
}

/// A parsed schema ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaId {
    author: Did,
    resource_id: String,
    version: Version,
}

impl SchemaId {
    pub fn new(author: Did, resource_id: impl Into<String>, version: Version) -> Self {
        Self {
            author,
            resource_id: resource_id.into(),
            version,
        }
    }

    /// Parse a schema ID string.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnrecognizedIdFormat`] if the string does not have
    ///   schema ID shape.
    /// - [`SchemaError::Identity`] if the author segment is not a valid DID.
    /// - [`SchemaError::UnrecognizedVersionFormat`] if the version overflows.
    pub fn parse(schema_id: &str) -> Result<Self, SchemaError> {
        let unrecognized = || SchemaError::UnrecognizedIdFormat(schema_id.to_string());
        if !is_schema_id(schema_id) {
            return Err(unrecognized());
        }
        let id_at = schema_id.find(ID_MARKER).ok_or_else(unrecognized)?;
        let version_at = schema_id.find(VERSION_MARKER).ok_or_else(unrecognized)?;
        let resource_start = id_at + ID_MARKER.len();
        if version_at < resource_start {
            return Err(unrecognized());
        }

        Ok(Self {
            author: Did::new(&schema_id[..id_at])?,
            resource_id: schema_id[resource_start..version_at].to_string(),
            version: Version::parse(&schema_id[version_at + VERSION_MARKER.len()..])?,
        })
    }

    pub fn author(&self) -> &Did {
        &self.author
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// The same schema at another version.
    pub fn with_version(&self, version: Version) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&generate_schema_id(
            &self.author,
            &self.resource_id,
            &self.version,
        ))
    }
}

impl std::str::FromStr for SchemaId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The version segment of a schema ID.
pub fn extract_schema_version_from_id(schema_id: &str) -> Result<Version, SchemaError> {
    SchemaId::parse(schema_id).map(|id| id.version)
}

/// The resource ID segment of a schema ID.
pub fn extract_schema_resource_id(schema_id: &str) -> Result<String, SchemaError> {
    SchemaId::parse(schema_id).map(|id| id.resource_id)
}

/// The author DID of a schema ID.
pub fn extract_schema_author_did(schema_id: &str) -> Result<Did, SchemaError> {
    SchemaId::parse(schema_id).map(|id| id.author)
}
