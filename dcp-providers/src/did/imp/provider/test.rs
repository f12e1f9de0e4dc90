use std::{collections::HashMap, sync::Arc};

use serde_json::json;
use time::Duration;

use super::DidMethodProviderImpl;
use crate::{
    common_models::did::DidValue,
    did::{
        error::{DidMethodError, DidMethodProviderError},
        model::{DidDocument, DidService},
        provider::DidMethodProvider,
        DidMethod, MockDidMethod,
    },
    remote_entity_storage::in_memory::InMemoryStorage,
};

fn document(did: &DidValue) -> DidDocument {
    DidDocument {
        context: json!(["https://www.w3.org/ns/did/v1"]),
        id: did.to_owned(),
        verification_method: vec![],
        authentication: None,
        assertion_method: None,
        service: Some(vec![DidService {
            id: format!("{did}#cs"),
            r#type: "CredentialService".to_owned(),
            service_endpoint: "https://holder.example/dcp".to_owned(),
        }]),
        rest: json!({}),
    }
}

fn provider(method: MockDidMethod) -> DidMethodProviderImpl {
    DidMethodProviderImpl::with_cache(
        HashMap::from([("WEB".to_owned(), Arc::new(method) as Arc<dyn DidMethod>)]),
        Arc::new(InMemoryStorage::default()),
        100,
        Duration::days(1),
        Duration::minutes(5),
    )
}

#[tokio::test]
async fn test_resolve_is_cached() {
    let mut method = MockDidMethod::default();
    method
        .expect_resolve()
        .once()
        .returning(|did| Ok(document(did)));

    let provider = provider(method);
    let did = DidValue::from("did:web:holder.example");

    let first = provider.resolve(&did).await.unwrap();
    let second = provider.resolve(&did).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.find_service("CredentialService").unwrap().service_endpoint,
        "https://holder.example/dcp"
    );
}

#[tokio::test]
async fn test_resolve_unknown_method() {
    let provider = provider(MockDidMethod::default());

    let result = provider
        .resolve(&DidValue::from("did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK"))
        .await;
    assert!(matches!(result, Err(DidMethodProviderError::MissingProvider(method)) if method == "KEY"));
}

#[tokio::test]
async fn test_resolve_invalid_did() {
    let provider = provider(MockDidMethod::default());

    let result = provider.resolve(&DidValue::from("not-a-did")).await;
    assert!(matches!(
        result,
        Err(DidMethodProviderError::MissingDidMethodNameInDidValue)
    ));
}

#[tokio::test]
async fn test_resolve_failure_is_not_cached() {
    let mut method = MockDidMethod::default();
    method
        .expect_resolve()
        .times(2)
        .returning(|_| Err(DidMethodError::Fetch {
                url: "https://holder.example/.well-known/did.json".to_owned(),
                reason: "offline".to_owned(),
            }));

    let provider = provider(method);
    let did = DidValue::from("did:web:holder.example");

    for _ in 0..2 {
        assert!(matches!(
            provider.resolve(&did).await,
            Err(DidMethodProviderError::DidMethod(_))
        ));
    }
}
