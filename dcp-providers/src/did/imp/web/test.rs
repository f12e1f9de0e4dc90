use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::{
    common_models::{did::DidValue, PublicKeyJwk},
    did::{
        error::DidMethodError,
        imp::web::{document_url, Params, WebDidMethod},
        model::CREDENTIAL_SERVICE_TYPE,
        DidMethod,
    },
    http_client::imp::reqwest_client::ReqwestClient,
};

fn did_document(did: &str) -> Value {
    json!({
        "@context": [
            "https://www.w3.org/ns/did/v1",
            "https://w3id.org/security/suites/jws-2020/v1"
        ],
        "id": did,
        "verificationMethod": [
            {
                "id": format!("{did}#key-1"),
                "type": "JsonWebKey2020",
                "controller": did,
                "publicKeyJwk": {
                    "kty": "EC",
                    "crv": "P-256",
                    "x": "38M1FDts7Oea7urmseiugGW7tWc3mLpJh6rKe7xINZ8",
                    "y": "nDQW6XZ7b_u2Sy9slofYLlG03sOEoug3I0aAPQ0exs4"
                }
            }
        ],
        "authentication": [format!("{did}#key-1")],
        "assertionMethod": [format!("{did}#key-1")],
        "service": [
            {
                "id": format!("{did}#credential-service"),
                "type": "CredentialService",
                "serviceEndpoint": "https://holder.example/api/dcp"
            },
            {
                "id": format!("{did}#other"),
                "type": ["LinkedDomains", "Other"],
                "serviceEndpoint": "https://holder.example"
            }
        ]
    })
}

fn did_method() -> WebDidMethod {
    WebDidMethod::new(
        Arc::new(ReqwestClient::default()),
        Params {
            resolve_to_insecure_http: Some(true),
        },
    )
}

fn local_did(mock_server: &MockServer, path: &str) -> DidValue {
    let host = mock_server
        .uri()
        .trim_start_matches("http://")
        .replace(':', "%3A");
    DidValue::from(format!("did:web:{host}{path}"))
}

#[tokio::test]
async fn test_did_web_resolve() {
    let mock_server = MockServer::start().await;
    let did = local_did(&mock_server, ":holder");

    Mock::given(method("GET"))
        .and(path("/holder/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(did_document(did.as_str())))
        .expect(1)
        .mount(&mock_server)
        .await;

    let document = did_method().resolve(&did).await.unwrap();

    assert_eq!(document.id, did);
    assert_eq!(document.verification_method.len(), 1);
    assert!(matches!(
        &document.verification_method[0].public_key_jwk,
        PublicKeyJwk::Ec(data) if data.crv == "P-256"
    ));
    assert_eq!(
        document.assertion_method,
        Some(vec![format!("{did}#key-1")])
    );

    let service = document.find_service(CREDENTIAL_SERVICE_TYPE).unwrap();
    assert_eq!(service.service_endpoint, "https://holder.example/api/dcp");
    assert_eq!(document.service.as_ref().unwrap().len(), 3);
    assert!(document.find_service("Other").is_some());
}

#[tokio::test]
async fn test_did_web_resolve_well_known() {
    let mock_server = MockServer::start().await;
    let did = local_did(&mock_server, "");

    Mock::given(method("GET"))
        .and(path("/.well-known/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(did_document(did.as_str())))
        .expect(1)
        .mount(&mock_server)
        .await;

    let document = did_method().resolve(&did).await.unwrap();
    assert_eq!(document.id, did);
}

#[tokio::test]
async fn test_did_web_resolve_not_found() {
    let mock_server = MockServer::start().await;
    let did = local_did(&mock_server, ":missing");

    Mock::given(method("GET"))
        .and(path("/missing/did.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = did_method().resolve(&did).await;
    assert!(matches!(result, Err(DidMethodError::Fetch { url, .. }) if url.ends_with("/missing/did.json")));
}

#[tokio::test]
async fn test_did_web_resolve_rejects_foreign_document() {
    let mock_server = MockServer::start().await;
    let did = local_did(&mock_server, ":holder");

    Mock::given(method("GET"))
        .and(path("/holder/did.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(did_document("did:web:someone.else")),
        )
        .mount(&mock_server)
        .await;

    let result = did_method().resolve(&did).await;
    assert!(matches!(result, Err(DidMethodError::InvalidDocument(_))));
}

#[tokio::test]
async fn test_did_web_resolve_invalid_body() {
    let mock_server = MockServer::start().await;
    let did = local_did(&mock_server, ":holder");

    Mock::given(method("GET"))
        .and(path("/holder/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let result = did_method().resolve(&did).await;
    assert!(matches!(result, Err(DidMethodError::InvalidDocument(_))));
}

#[test]
fn test_did_web_value_to_url() {
    let test_cases = vec![
        (
            "did:web:w3c-ccg.github.io",
            "https://w3c-ccg.github.io/.well-known/did.json",
        ),
        (
            "did:web:w3c-ccg.github.io:user:alice",
            "https://w3c-ccg.github.io/user/alice/did.json",
        ),
        (
            "did:web:example.com%3A3000:user:alice",
            "https://example.com:3000/user/alice/did.json",
        ),
    ];

    for (did, url) in test_cases {
        assert_eq!(
            url,
            document_url(&DidValue::from(did), false)
                .unwrap()
                .to_string()
        )
    }
}

#[test]
fn test_did_web_value_to_url_insecure_http() {
    assert_eq!(
        "http://example.com:3000/user/alice/did.json",
        document_url(&DidValue::from("did:web:example.com%3A3000:user:alice"), true)
            .unwrap()
            .to_string()
    );
}

#[test]
fn test_did_web_value_to_url_invalid() {
    for did in ["did:key:z6Mk", "did:web:", "web:example.com", "did:web:example.com::alice"] {
        assert!(matches!(
            document_url(&DidValue::from(did), false),
            Err(DidMethodError::InvalidDid(_))
        ));
    }
}
