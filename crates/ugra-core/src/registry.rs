//! # Linked Data Suite Registries
//!
//! Verification-method key types and proof types from the W3C CCG
//! Linked Data Cryptographic Suite Registry. Both are open sets: a value
//! outside the known list is preserved as `Other` so documents using newer
//! suites still round-trip.

use serde::{Deserialize, Serialize};

/// Verification method key type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeyType {
    /// <https://w3c-ccg.github.io/lds-jws2020/>
    JsonWebKey2020,
    /// <https://w3c-ccg.github.io/lds-ed25519-2018/>
    Ed25519VerificationKey2018,
    /// <https://w3c-ccg.github.io/lds-ecdsa-secp256k1-2019/>
    EcdsaSecp256k1VerificationKey2019,
    /// <https://w3c-ccg.github.io/lds-rsa2018/>
    RsaVerificationKey2018,
    /// Any other registered or private key type.
    Other(String),
}

impl KeyType {
    /// Registry name of the key type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::JsonWebKey2020 => "JsonWebKey2020",
            Self::Ed25519VerificationKey2018 => "Ed25519VerificationKey2018",
            Self::EcdsaSecp256k1VerificationKey2019 => "EcdsaSecp256k1VerificationKey2019",
            Self::RsaVerificationKey2018 => "RsaVerificationKey2018",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for KeyType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "JsonWebKey2020" => Self::JsonWebKey2020,
            "Ed25519VerificationKey2018" => Self::Ed25519VerificationKey2018,
            "EcdsaSecp256k1VerificationKey2019" => Self::EcdsaSecp256k1VerificationKey2019,
            "RsaVerificationKey2018" => Self::RsaVerificationKey2018,
            _ => Self::Other(value),
        }
    }
}

impl From<KeyType> for String {
    fn from(value: KeyType) -> Self {
        match value {
            KeyType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof suite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProofType {
    /// <https://w3c-ccg.github.io/lds-jws2020>
    JsonWebSignature2020,
    /// Any other proof suite.
    Other(String),
}

impl ProofType {
    /// Registry name of the proof type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::JsonWebSignature2020 => "JsonWebSignature2020",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ProofType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "JsonWebSignature2020" => Self::JsonWebSignature2020,
            _ => Self::Other(value),
        }
    }
}

impl From<ProofType> for String {
    fn from(value: ProofType) -> Self {
        match value {
            ProofType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
