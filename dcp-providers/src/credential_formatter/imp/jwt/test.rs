use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{macros::datetime, OffsetDateTime};

use super::{model::JwtClaims, Jwt, TokenVerifier};
use crate::{
    common_models::did::DidValue,
    credential_formatter::{
        error::FormatterError,
        imp::common::{MockAuth, SignerError},
    },
};

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq)]
struct Payload {
    test_field: String,
}

fn get_dummy_date() -> OffsetDateTime {
    datetime!(2005-04-02 21:37 +1)
}

struct TestVerify {
    issuer_did_value: Option<String>,
    algorithm: String,
    token: String,
    signature: Vec<u8>,
}

#[async_trait]
impl TokenVerifier for TestVerify {
    async fn verify<'a>(
        &self,
        issuer_did_value: Option<DidValue>,
        _issuer_key_id: Option<&'a str>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError> {
        assert_eq!(
            issuer_did_value.map(|v| v.to_string()),
            self.issuer_did_value
        );
        assert_eq!(algorithm, self.algorithm);
        assert_eq!(token, self.token.as_bytes());

        if signature == self.signature {
            Ok(())
        } else {
            Err(SignerError::InvalidSignature)
        }
    }
}

fn prepare_test_json() -> (Jwt<Payload>, String) {
    let now = get_dummy_date();

    let payload = JwtClaims {
        issued_at: Some(now),
        expires_at: Some(now),
        not_before: Some(now),
        issuer: Some("DID".to_owned()),
        subject: Some("DID".to_owned()),
        audience: None,
        jwt_id: Some("ID".to_owned()),
        custom: Payload {
            test_field: "test".to_owned(),
        },
    };
    let jwt: Jwt<Payload> = Jwt::new(
        "Signature1".to_owned(),
        "Algorithm1".to_owned(),
        None,
        payload,
    );

    (jwt, "eyJhbGciOiJBbGdvcml0aG0xIiwidHlwIjoiU2lnbmF0dXJlMSJ9.eyJpYXQiOjExMTI0NzQyMjAsImV4cCI6MTExMjQ3NDIyMCwibmJmIjoxMTEyNDc0MjIwLCJpc3MiOiJESUQiLCJzdWIiOiJESUQiLCJqdGkiOiJJRCIsInRlc3RfZmllbGQiOiJ0ZXN0In0.AQID".to_string())
}

fn extract_jwt_part(token: &str) -> String {
    let (signing_input, _) = token.rsplit_once('.').unwrap();
    signing_input.to_owned()
}

#[tokio::test]
async fn test_tokenize() {
    let (json, reference_token) = prepare_test_json();

    let expected_input = extract_jwt_part(&reference_token);
    let auth_fn = MockAuth(move |data: &[u8]| {
        assert_eq!(data, expected_input.as_bytes());
        vec![1u8, 2, 3]
    });

    let token = json.tokenize(Box::new(auth_fn)).await.unwrap();

    assert_eq!(token, reference_token);
}

#[tokio::test]
async fn test_build_from_token() {
    let (json, reference_token) = prepare_test_json();

    let jwt: Jwt<Payload> = Jwt::build_from_token(
        &reference_token,
        Some(Box::new(TestVerify {
            issuer_did_value: Some(String::from("DID")),
            algorithm: String::from("Algorithm1"),
            token: extract_jwt_part(&reference_token),
            signature: vec![1, 2, 3],
        })),
    )
    .await
    .unwrap();

    assert_eq!(jwt.header.algorithm, json.header.algorithm);
    assert_eq!(jwt.header.signature_type, json.header.signature_type);

    assert_eq!(jwt.payload.custom, json.payload.custom);
    assert_eq!(jwt.payload.issuer, json.payload.issuer);
    assert_eq!(jwt.payload.jwt_id, json.payload.jwt_id);
}

#[tokio::test]
async fn test_build_from_token_rejects_wrong_signature() {
    let (_, reference_token) = prepare_test_json();

    let result = Jwt::<Payload>::build_from_token(
        &reference_token,
        Some(Box::new(TestVerify {
            issuer_did_value: Some(String::from("DID")),
            algorithm: String::from("Algorithm1"),
            token: extract_jwt_part(&reference_token),
            signature: vec![3, 2, 1],
        })),
    )
    .await;

    assert!(matches!(result, Err(FormatterError::Verification(_))));
}

#[tokio::test]
async fn test_audience_accepts_string_or_list() {
    let auth_fn = || Box::new(MockAuth(|_: &[u8]| vec![1u8]));
    let payload = |audience: Vec<&str>| JwtClaims {
        audience: Some(audience.into_iter().map(str::to_owned).collect()),
        custom: Payload {
            test_field: "test".to_owned(),
        },
        ..Default::default()
    };

    let single = Jwt::new("JWT".to_owned(), "ES256".to_owned(), None, payload(vec!["did:web:a"]))
        .tokenize(auth_fn())
        .await
        .unwrap();
    let decomposed = Jwt::<serde_json::Map<String, serde_json::Value>>::decompose_token(&single).unwrap();
    assert!(decomposed.payload_json.contains(r#""aud":"did:web:a""#));

    let many = Jwt::new(
        "JWT".to_owned(),
        "ES256".to_owned(),
        None,
        payload(vec!["did:web:a", "did:web:b"]),
    )
    .tokenize(auth_fn())
    .await
    .unwrap();
    let parsed = Jwt::<Payload>::build_from_token(&many, None).await.unwrap();
    assert_eq!(
        parsed.payload.audience,
        Some(vec!["did:web:a".to_owned(), "did:web:b".to_owned()])
    );
}

#[test]
fn test_decompose_token_missing_part() {
    let result = Jwt::<Payload>::decompose_token("eyJhbGciOiJFUzI1NiJ9");
    assert!(matches!(
        result,
        Err(FormatterError::MalformedToken(_))
    ));
}
