use std::sync::Arc;

use ct_codecs::{Base64UrlSafeNoPadding, Decoder};
use serde_json::{json, Value};

use super::{verify_presentation, VerifiablePresentationSigner, PROOF_TYPE};
use crate::{
    common_models::did::KeyRole,
    credential_formatter::{
        imp::{common::MockAuth, jwt::Jwt},
        profile::ProfileId,
    },
    presentation::{error::PresentationError, model::VerifiablePresentation},
    util::{
        key_verification::KeyVerification,
        test_utilities::{did_method_provider, TestIdentity},
    },
};

fn presentation(holder: &TestIdentity, credentials: Vec<Value>) -> VerifiablePresentation {
    VerifiablePresentation::builder(holder.did.clone())
        .id("urn:uuid:6a1f7a52-0c4b-4c1e-9a8e-3f0e5c1d2b7a")
        .credential_ids(vec!["urn:uuid:credential-1".to_owned()])
        .credentials(credentials)
        .build()
        .unwrap()
}

fn verification(holder: &TestIdentity) -> Box<KeyVerification> {
    Box::new(KeyVerification {
        did_method_provider: Arc::new(did_method_provider(vec![holder.did_document(None)])),
        key_algorithm_provider: holder.key_algorithm_provider.clone(),
        key_role: KeyRole::Authentication,
    })
}

#[tokio::test]
async fn test_sign_jwt_presentation() {
    let holder = TestIdentity::new("did:web:holder.example");
    let vp = presentation(&holder, vec![json!("header.payload.signature")]);

    let signed = VerifiablePresentationSigner
        .sign(&vp, "jwt", holder.auth_fn())
        .await
        .unwrap();
    let token = signed.as_str().unwrap();

    let decomposed = Jwt::<serde_json::Map<String, Value>>::decompose_token(token).unwrap();
    assert_eq!(decomposed.header.algorithm, "ES256");
    assert_eq!(decomposed.header.key_id, Some(holder.key_reference()));
    assert_eq!(decomposed.payload.issuer.as_deref(), Some(holder.did.as_str()));
    assert_eq!(decomposed.payload.subject.as_deref(), Some(holder.did.as_str()));
    assert_eq!(decomposed.payload.jwt_id.as_deref(), Some(vp.id.as_str()));
    assert!(decomposed.payload.issued_at.is_some());
    assert!(decomposed.payload.expires_at.is_none());
    assert!(decomposed.payload.not_before.is_none());
    assert!(decomposed.payload.audience.is_none());
    assert_eq!(
        decomposed.payload.custom["vp"],
        json!({
            "@context": ["https://www.w3.org/ns/credentials/v2"],
            "type": ["VerifiablePresentation"],
            "verifiableCredential": ["header.payload.signature"]
        })
    );

    let received = verify_presentation(&signed, verification(&holder))
        .await
        .unwrap();
    assert_eq!(received.holder, Some(holder.did.clone()));
    assert_eq!(received.credentials, vec![json!("header.payload.signature")]);
}

#[tokio::test]
async fn test_sign_jwt_presentation_falls_back_to_ids() {
    let holder = TestIdentity::new("did:web:holder.example");
    let vp = VerifiablePresentation::builder(holder.did.clone())
        .credential_ids(vec!["urn:uuid:credential-1".to_owned()])
        .profile_id(ProfileId::Vc11Sl2021Jwt)
        .build()
        .unwrap();

    let signed = VerifiablePresentationSigner
        .sign(&vp, "JWT", holder.auth_fn())
        .await
        .unwrap();

    let decomposed =
        Jwt::<serde_json::Map<String, Value>>::decompose_token(signed.as_str().unwrap()).unwrap();
    assert_eq!(
        decomposed.payload.custom["vp"]["verifiableCredential"],
        json!(["urn:uuid:credential-1"])
    );
    assert_eq!(
        decomposed.payload.custom["vp"]["@context"],
        json!(["https://www.w3.org/2018/credentials/v1"])
    );
}

#[tokio::test]
async fn test_sign_json_ld_presentation() {
    let holder = TestIdentity::new("did:web:holder.example");
    let vp = presentation(&holder, vec![]);

    let signed = VerifiablePresentationSigner
        .sign(&vp, "json-ld", holder.auth_fn())
        .await
        .unwrap();

    assert_eq!(signed["id"], json!(vp.id));
    assert_eq!(signed["holder"], json!(holder.did.as_str()));
    assert_eq!(signed["verifiableCredential"], json!(["urn:uuid:credential-1"]));

    let proof = &signed["proof"];
    assert_eq!(proof["type"], PROOF_TYPE);
    assert_eq!(proof["proofPurpose"], "authentication");
    assert_eq!(proof["verificationMethod"], json!(holder.key_reference()));

    let jws = proof["jws"].as_str().unwrap();
    let (header, signature) = jws.split_once("..").unwrap();
    assert!(!signature.is_empty());
    let header: Value =
        serde_json::from_slice(&Base64UrlSafeNoPadding::decode_to_vec(header, None).unwrap())
            .unwrap();
    assert_eq!(header, json!({ "alg": "ES256", "b64": false, "crit": ["b64"] }));

    let received = verify_presentation(&signed, verification(&holder))
        .await
        .unwrap();
    assert_eq!(received.id.as_deref(), Some(vp.id.as_str()));
    assert_eq!(received.credentials, vec![json!("urn:uuid:credential-1")]);
}

#[tokio::test]
async fn test_tampered_json_ld_presentation_fails() {
    let holder = TestIdentity::new("did:web:holder.example");
    let vp = presentation(&holder, vec![]);

    let mut signed = VerifiablePresentationSigner
        .sign(&vp, "json-ld", holder.auth_fn())
        .await
        .unwrap();
    signed["verifiableCredential"] = json!(["urn:uuid:someone-elses"]);

    let result = verify_presentation(&signed, verification(&holder)).await;
    assert!(matches!(result, Err(PresentationError::Invalid(_))));
}

#[tokio::test]
async fn test_jwt_presentation_signed_by_other_key_fails() {
    let holder = TestIdentity::new("did:web:holder.example");
    let impostor = TestIdentity::new("did:web:holder.example");
    let vp = presentation(&impostor, vec![]);

    let signed = VerifiablePresentationSigner
        .sign(&vp, "jwt", impostor.auth_fn())
        .await
        .unwrap();

    let result = verify_presentation(&signed, verification(&holder)).await;
    assert!(matches!(result, Err(PresentationError::Formatter(_))));
}

#[tokio::test]
async fn test_unsupported_format() {
    let holder = TestIdentity::new("did:web:holder.example");
    let vp = presentation(&holder, vec![]);

    let result = VerifiablePresentationSigner
        .sign(&vp, "cbor", Box::new(MockAuth(|_| vec![1])))
        .await;
    assert!(matches!(result, Err(PresentationError::UnsupportedFormat(format)) if format == "cbor"));
}

#[tokio::test]
async fn test_verify_rejects_other_shapes() {
    let holder = TestIdentity::new("did:web:holder.example");

    let result = verify_presentation(&json!(42), verification(&holder)).await;
    assert!(matches!(result, Err(PresentationError::Invalid(_))));

    let result = verify_presentation(&json!({ "holder": "did:web:x" }), verification(&holder)).await;
    assert!(matches!(result, Err(PresentationError::Invalid(_))));
}

#[test]
fn test_builder_requires_credential_ids() {
    let result = VerifiablePresentation::builder("did:web:holder.example".into()).build();
    assert!(result.is_err());
}
