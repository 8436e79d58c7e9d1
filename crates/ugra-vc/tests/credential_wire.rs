//! Wire-shape behaviour of credentials: the byte-level normalization
//! pipeline and the typed codec must agree.

use serde_json::{json, Value};
use ugra_core::{normalize_document, Normalizer};
use ugra_vc::{JsonWebSignature2020Proof, VerifiableCredential, VC_CONTEXT_V1};

fn two_proof_credential() -> Value {
    json!({
        "@context": [VC_CONTEXT_V1, "https://w3id.org/security/suites/jws-2020/v1"],
        "id": "did:ugra:issuer#7",
        "type": ["VerifiableCredential", "SchemaCredential"],
        "issuer": "did:ugra:issuer",
        "issuanceDate": "2021-03-01T12:00:00Z",
        "expirationDate": "2031-03-01T12:00:00Z",
        "credentialSchema": {
            "id": "did:ugra:issuer;id=abc;version=1.0",
            "type": "JsonSchemaValidator2018"
        },
        "credentialStatus": {"id": "https://status.example.com/1", "type": "RevocationList2020"},
        "credentialSubject": {"id": "did:ugra:holder", "emailAddress": "a@example.com"},
        "proof": [
            {
                "type": "JsonWebSignature2020",
                "proofPurpose": "assertionMethod",
                "verificationMethod": "did:ugra:issuer#key-1",
                "created": "2021-03-01T12:00:00Z",
                "jws": "first"
            },
            {
                "type": "JsonWebSignature2020",
                "proofPurpose": "assertionMethod",
                "verificationMethod": "did:ugra:issuer#key-2",
                "created": "2021-03-02T12:00:00Z",
                "jws": "second"
            }
        ]
    })
}

#[test]
fn plural_members_survive_round_trip() {
    let raw = two_proof_credential();
    let vc: VerifiableCredential = serde_json::from_value(raw.clone()).unwrap();
    vc.validate().unwrap();
    assert_eq!(serde_json::to_value(&vc).unwrap(), raw);

    let proofs: Vec<JsonWebSignature2020Proof> = vc.proof_values().unwrap();
    assert_eq!(
        proofs.iter().map(|p| p.jws.as_str()).collect::<Vec<_>>(),
        ["first", "second"]
    );
}

#[test]
fn byte_pipeline_matches_typed_decode() {
    let mut raw = two_proof_credential();
    raw["type"] = json!("VerifiableCredential");
    raw["proof"] = raw["proof"][0].clone();
    let bytes = serde_json::to_vec(&raw).unwrap();

    let decode = [
        Normalizer::plural("@context"),
        Normalizer::plural("type"),
        Normalizer::unplural("credentialSubject"),
        Normalizer::plural("proof"),
    ];
    let normalized: Value =
        serde_json::from_slice(&normalize_document(&bytes, &decode).unwrap()).unwrap();
    assert_eq!(normalized["type"], json!(["VerifiableCredential"]));
    assert!(normalized["proof"].is_array());

    let typed = VerifiableCredential::from_slice(&bytes).unwrap();
    assert_eq!(typed.types.len(), 1);
    assert_eq!(typed.proof.len(), 1);
    assert_eq!(
        serde_json::to_value(&typed).unwrap()["proof"]["jws"],
        json!("first")
    );
}

#[test]
fn subject_schema_reference_is_typed() {
    let vc: VerifiableCredential = serde_json::from_value(two_proof_credential()).unwrap();
    let schema = vc.credential_schema.as_ref().unwrap();
    assert_eq!(schema.schema_type.as_str(), "JsonSchemaValidator2018");
    assert_eq!(
        vc.credential_status.as_ref().unwrap().status_type,
        "RevocationList2020"
    );
}

#[test]
fn null_proof_decodes_as_unproven() {
    let mut raw = two_proof_credential();
    raw["proof"] = Value::Null;

    let typed: VerifiableCredential = serde_json::from_value(raw.clone()).unwrap();
    assert!(typed.proof.is_empty());
    assert!(typed.proofs().unwrap().is_empty());

    let from_bytes = VerifiableCredential::from_slice(&serde_json::to_vec(&raw).unwrap()).unwrap();
    assert_eq!(from_bytes, typed);
    assert!(serde_json::to_value(&typed).unwrap().get("proof").is_none());
}
