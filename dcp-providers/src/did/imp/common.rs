//! Builds the document a participant publishes for its own `did:web`.

use serde_json::json;

use crate::{
    common_models::{did::DidValue, PublicKeyJwk},
    did::model::{DidDocument, DidService, DidVerificationMethod, CREDENTIAL_SERVICE_TYPE},
};

pub fn jwk_context() -> serde_json::Value {
    json!([
        "https://www.w3.org/ns/did/v1",
        "https://w3id.org/security/suites/jws-2020/v1",
    ])
}

pub fn jwk_verification_method(
    id: String,
    did: &DidValue,
    jwk: PublicKeyJwk,
) -> DidVerificationMethod {
    DidVerificationMethod {
        id,
        r#type: "JsonWebKey2020".into(),
        controller: did.to_string(),
        public_key_jwk: jwk,
    }
}

/// Single-key document; the key serves both authentication and assertion. The
/// `CredentialService` entry is added when an endpoint is given.
pub fn single_key_did_document(
    did: &DidValue,
    key_id: &str,
    jwk: PublicKeyJwk,
    credential_service_url: Option<&str>,
) -> DidDocument {
    let verification_method_id = did.key_reference(key_id);

    DidDocument {
        context: jwk_context(),
        id: did.to_owned(),
        verification_method: vec![jwk_verification_method(
            verification_method_id.to_owned(),
            did,
            jwk,
        )],
        authentication: Some(vec![verification_method_id.to_owned()]),
        assertion_method: Some(vec![verification_method_id]),
        service: credential_service_url.map(|url| {
            vec![DidService {
                id: format!("{did}#credential-service"),
                r#type: CREDENTIAL_SERVICE_TYPE.to_owned(),
                service_endpoint: url.to_owned(),
            }]
        }),
        rest: json!({}),
    }
}
