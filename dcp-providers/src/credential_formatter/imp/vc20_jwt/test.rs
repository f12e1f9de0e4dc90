use serde_json::{json, Map, Value};
use time::{macros::datetime, Duration};

use super::{Params, Vc20JwtFormatter};
use crate::{
    common_models::did::DidValue,
    credential_formatter::{
        error::FormatterError,
        imp::{common::MockAuth, jwt::Jwt},
        model::{CredentialData, MockTokenVerifier, StatusListCoordinates},
        profile::ProfileId,
        CredentialFormatter,
    },
    crypto::SignerError,
};

fn credential_data(status: Option<StatusListCoordinates>) -> CredentialData {
    CredentialData {
        issuer_did: DidValue::from("did:web:issuer.example"),
        holder_did: DidValue::from("did:web:holder.example"),
        credential_type: "MembershipCredential".to_owned(),
        claims: json!({ "membershipType": "Premium", "status": "Active" })
            .as_object()
            .cloned()
            .unwrap(),
        status,
        issuance_date: datetime!(2024-05-01 10:00:00.123 UTC),
        valid_for: Duration::days(365),
        schema: None,
    }
}

fn formatter() -> Vc20JwtFormatter {
    Vc20JwtFormatter::new(Params { leeway: 60 })
}

async fn generate(status: Option<StatusListCoordinates>) -> String {
    formatter()
        .generate_jwt(
            credential_data(status),
            Box::new(MockAuth(|_: &[u8]| vec![1u8, 2, 3])),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_generate_flat_structure() {
    let token = generate(None).await;

    let decomposed = Jwt::<Map<String, Value>>::decompose_token(&token).unwrap();
    assert_eq!(decomposed.header.signature_type.as_deref(), Some("vc+ld+jwt"));
    assert_eq!(decomposed.header.algorithm, "ES256");
    assert_eq!(
        decomposed.header.key_id.as_deref(),
        Some("did:web:issuer.example#key-1")
    );

    let payload: Value = serde_json::from_str(&decomposed.payload_json).unwrap();
    assert_eq!(payload["iss"], "did:web:issuer.example");
    assert_eq!(payload["sub"], "did:web:holder.example");
    assert!(payload["jti"].as_str().unwrap().starts_with("urn:uuid:"));
    assert_eq!(payload["@context"], json!(["https://www.w3.org/ns/credentials/v2"]));
    assert_eq!(
        payload["type"],
        json!(["VerifiableCredential", "MembershipCredential"])
    );
    assert_eq!(payload["issuer"], json!({ "id": "did:web:issuer.example" }));
    assert_eq!(payload["validFrom"], "2024-05-01T10:00:00Z");
    assert_eq!(payload["validUntil"], "2025-05-01T10:00:00Z");
    assert_eq!(payload["credentialSubject"]["id"], "did:web:holder.example");
    assert_eq!(payload["credentialSubject"]["membershipType"], "Premium");

    assert!(payload.get("vc").is_none());
    assert!(payload.get("proof").is_none());
    assert!(payload.get("credentialStatus").is_none());
}

#[tokio::test]
async fn test_generate_with_bitstring_status_entry() {
    let token = generate(Some(StatusListCoordinates {
        status_list_credential: "https://issuer.example/status/1".to_owned(),
        index: 94567,
    }))
    .await;

    let decomposed = Jwt::<Map<String, Value>>::decompose_token(&token).unwrap();
    let payload: Value = serde_json::from_str(&decomposed.payload_json).unwrap();

    assert_eq!(
        payload["credentialStatus"],
        json!({
            "id": "https://issuer.example/status/1#94567",
            "type": "BitstringStatusListEntry",
            "statusPurpose": "revocation",
            "statusListIndex": "94567",
            "statusListCredential": "https://issuer.example/status/1"
        })
    );
}

#[tokio::test]
async fn test_extract_credential() {
    let token = generate(None).await;

    let mut verifier = MockTokenVerifier::default();
    verifier
        .expect_verify()
        .withf(|issuer, key_id, algorithm, _, signature| {
            issuer.as_ref().map(|did| did.as_str()) == Some("did:web:issuer.example")
                && *key_id == Some("did:web:issuer.example#key-1")
                && algorithm == "ES256"
                && signature == [1, 2, 3]
        })
        .once()
        .returning(|_, _, _, _, _| Ok(()));

    let credential = formatter()
        .extract_credential(&token, Box::new(verifier))
        .await
        .unwrap();

    assert_eq!(credential.profile, ProfileId::Vc20BsslJwt);
    assert_eq!(credential.credential_type(), Some("MembershipCredential"));
    assert_eq!(
        credential.subject,
        Some(DidValue::from("did:web:holder.example"))
    );
    assert_eq!(
        credential.valid_until,
        Some(datetime!(2025-05-01 10:00:00 UTC))
    );
    assert_eq!(credential.claims.values["status"], "Active");
    assert_eq!(credential.credential["issuer"]["id"], "did:web:issuer.example");
}

#[tokio::test]
async fn test_extract_credential_bad_signature() {
    let token = generate(None).await;

    let mut verifier = MockTokenVerifier::default();
    verifier
        .expect_verify()
        .returning(|_, _, _, _, _| Err(SignerError::InvalidSignature));

    let result = formatter()
        .extract_credential(&token, Box::new(verifier))
        .await;
    assert!(matches!(result, Err(FormatterError::Verification(_))));
}
