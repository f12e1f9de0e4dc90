use serde_json::json;
use time::{macros::datetime, Duration, OffsetDateTime};

use super::*;

fn credential(id: &str, holder: &str, credential_type: &str) -> VerifiableCredential {
    VerifiableCredential::builder()
        .id(id)
        .holder_did(holder.into())
        .issuer_did("did:web:issuer.example".into())
        .credential_type(credential_type)
        .issuance_date(datetime!(2026-01-01 0:00 UTC))
        .credential(json!({ "id": id }))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_find_credentials_by_holder_and_types() {
    let storage = InMemoryCredentialStorage::default();
    storage
        .save(credential("1", "did:web:alice", "MembershipCredential"))
        .await
        .unwrap();
    storage
        .save(credential("2", "did:web:alice", "DataProcessorCredential"))
        .await
        .unwrap();
    storage
        .save(credential("3", "did:web:bob", "MembershipCredential"))
        .await
        .unwrap();

    let found = storage
        .find_by_holder_and_types(
            &"did:web:alice".into(),
            &["MembershipCredential".to_owned()],
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "1");

    let found = storage
        .find_by_holder_and_types(&"did:web:alice".into(), &[])
        .await
        .unwrap();
    assert!(found.is_empty());

    assert!(storage.get("3").await.unwrap().is_some());
    assert!(storage.get("4").await.unwrap().is_none());
}

#[tokio::test]
async fn test_credential_request_save_replaces() {
    let storage = InMemoryCredentialRequestStorage::default();
    let mut request = CredentialRequest::new(
        "holder-pid",
        "did:web:alice".into(),
        vec!["MembershipCredential".to_owned()],
    )
    .unwrap();
    storage.save(request.clone()).await.unwrap();

    request.reject("not a member").unwrap();
    storage.save(request.clone()).await.unwrap();

    let stored = storage.get(request.issuer_pid()).await.unwrap().unwrap();
    assert_eq!(stored, request);
}

#[tokio::test]
async fn test_credential_request_replace_if() {
    let storage = InMemoryCredentialRequestStorage::default();
    let pending = CredentialRequest::new(
        "holder-pid",
        "did:web:alice".into(),
        vec!["MembershipCredential".to_owned()],
    )
    .unwrap();

    let mut issued = pending.clone();
    issued.issue().unwrap();
    assert!(!storage
        .replace_if(issued.clone(), CredentialRequestStatus::Pending)
        .await
        .unwrap());

    storage.save(pending.clone()).await.unwrap();
    assert!(storage
        .replace_if(issued, CredentialRequestStatus::Pending)
        .await
        .unwrap());

    let mut rejected = pending.clone();
    rejected.reject("too late").unwrap();
    assert!(!storage
        .replace_if(rejected, CredentialRequestStatus::Pending)
        .await
        .unwrap());

    assert!(storage
        .replace_if(pending.clone(), CredentialRequestStatus::Issued)
        .await
        .unwrap());
    let stored = storage.get(pending.issuer_pid()).await.unwrap().unwrap();
    assert_eq!(stored.status(), CredentialRequestStatus::Pending);
}

#[tokio::test]
async fn test_consent_storage() {
    let storage = InMemoryConsentStorage::default();
    let consent = ConsentRecord::builder("did:web:alice".into())
        .requested(vec!["MembershipCredential".to_owned()])
        .granted(vec!["MembershipCredential".to_owned()])
        .expires_at(OffsetDateTime::now_utc() + Duration::hours(1))
        .build()
        .unwrap();
    storage.save(consent.clone()).await.unwrap();

    assert_eq!(
        storage.find_by_holder(&"did:web:alice".into()).await.unwrap(),
        vec![consent.clone()]
    );
    assert!(storage
        .find_by_holder(&"did:web:bob".into())
        .await
        .unwrap()
        .is_empty());

    assert!(storage.delete(&consent.id).await.unwrap());
    assert!(!storage.delete(&consent.id).await.unwrap());
    assert!(storage.get(&consent.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_presentation_storage() {
    let storage = InMemoryPresentationStorage::default();
    let presentation = VerifiablePresentation::builder("did:web:alice".into())
        .credential_ids(vec!["urn:uuid:1".to_owned()])
        .build()
        .unwrap();
    storage.save(presentation.clone()).await.unwrap();

    assert_eq!(
        storage.get(&presentation.id).await.unwrap(),
        Some(presentation)
    );
}
