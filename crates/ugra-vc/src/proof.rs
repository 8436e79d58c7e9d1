//! # Proof Types
//!
//! Linked Data proof envelopes attached to Verifiable Credentials.
//!
//! ## Proof Types Supported
//!
//! - JsonWebSignature2020 (detached JWS in `jws`).
//! - Any other suite decodes to the common [`Proof`] fields, with the
//!   suite name kept in [`ProofType::Other`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ugra_core::{ProofType, Uri};

/// The members every Linked Data proof carries.
///
/// Only `type` and `verificationMethod` are required on decode; proofs
/// without `proofPurpose` or `created` still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// The proof suite.
    #[serde(rename = "type")]
    pub proof_type: ProofType,
    /// Why the proof was made, e.g. `assertionMethod`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub proof_purpose: String,
    /// The DID URL of the verification method used.
    pub verification_method: Uri,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// A JsonWebSignature2020 proof: the common members plus a detached JWS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonWebSignature2020Proof {
    #[serde(flatten)]
    pub proof: Proof,
    pub jws: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jws_proof_flattened() {
        let raw = json!({
            "type": "JsonWebSignature2020",
            "proofPurpose": "assertionMethod",
            "verificationMethod": "did:ugra:issuer#key-1",
            "created": "2021-03-01T12:00:00Z",
            "jws": "eyJhbGciOiJFZERTQSJ9..sig"
        });
        let proof: JsonWebSignature2020Proof = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(proof.proof.proof_type, ProofType::JsonWebSignature2020);
        assert_eq!(proof.proof.verification_method, "did:ugra:issuer#key-1");
        assert!(proof.proof.domain.is_none());
        assert_eq!(serde_json::to_value(&proof).unwrap(), raw);
    }

    #[test]
    fn test_other_suite_decodes_to_common_fields() {
        let proof: Proof = serde_json::from_value(json!({
            "type": "Ed25519Signature2020",
            "proofPurpose": "authentication",
            "verificationMethod": "did:ugra:holder#key-2",
            "created": "2021-03-01T12:00:00Z",
            "domain": "example.com",
            "proofValue": "z58DAdFfa9"
        }))
        .unwrap();
        assert_eq!(
            proof.proof_type,
            ProofType::Other("Ed25519Signature2020".to_string())
        );
        assert_eq!(proof.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_missing_purpose_and_created_decode() {
        let raw = json!({
            "type": "JsonWebSignature2020",
            "verificationMethod": "did:ugra:issuer#key-1"
        });
        let proof: Proof = serde_json::from_value(raw.clone()).unwrap();
        assert!(proof.proof_purpose.is_empty());
        assert!(proof.created.is_none());
        assert_eq!(serde_json::to_value(&proof).unwrap(), raw);
    }

    #[test]
    fn test_missing_verification_method_rejected() {
        let result: Result<Proof, _> = serde_json::from_value(json!({
            "type": "JsonWebSignature2020",
            "proofPurpose": "assertionMethod",
            "created": "2021-03-01T12:00:00Z"
        }));
        assert!(result.is_err());
    }
}
