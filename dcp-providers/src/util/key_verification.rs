//! Utilities for signature verification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    common_models::did::{DidValue, KeyRole},
    credential_formatter::model::TokenVerifier,
    crypto::SignerError,
    did::{model::DidDocument, provider::DidMethodProvider},
    key_algorithm::provider::KeyAlgorithmProvider,
};

/// Verifies token signatures against a key the signer's DID document lists for `key_role`.
#[derive(Clone)]
pub struct KeyVerification {
    pub did_method_provider: Arc<dyn DidMethodProvider>,
    pub key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    pub key_role: KeyRole,
}

#[async_trait]
impl TokenVerifier for KeyVerification {
    async fn verify<'a>(
        &self,
        issuer_did_value: Option<DidValue>,
        issuer_key_id: Option<&'a str>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError> {
        let did_document = self
            .did_method_provider
            .resolve(
                &issuer_did_value
                    .ok_or(SignerError::Verification("Missing issuer".to_string()))?,
            )
            .await
            .map_err(|e| SignerError::Verification(e.to_string()))?;

        let key_id_list = match &self.key_role {
            KeyRole::Authentication => did_document.authentication.as_ref(),
            KeyRole::AssertionMethod => did_document.assertion_method.as_ref(),
        }
        .ok_or(SignerError::MissingKey)?;

        let method_id = match issuer_key_id {
            Some(issuer_key_id) => key_id_list
                .iter()
                .find(|id| key_id_matches(id, issuer_key_id))
                .ok_or(SignerError::MissingKey)?,
            None => key_id_list.first().ok_or(SignerError::MissingKey)?,
        };

        let method = verification_method(&did_document, method_id)?;

        let alg = self
            .key_algorithm_provider
            .get_key_algorithm(algorithm)
            .ok_or(SignerError::Verification(format!(
                "Invalid algorithm: {algorithm}"
            )))?;

        let public_key = alg
            .jwk_to_bytes(&method.public_key_jwk)
            .map_err(|e| SignerError::Verification(e.to_string()))?;

        let signer = self
            .key_algorithm_provider
            .get_signer(algorithm)
            .map_err(|e| SignerError::Verification(e.to_string()))?;

        signer.verify(token, signature, &public_key)
    }
}

fn verification_method<'a>(
    did_document: &'a DidDocument,
    method_id: &str,
) -> Result<&'a crate::did::model::DidVerificationMethod, SignerError> {
    did_document
        .verification_method
        .iter()
        .find(|method| key_id_matches(&method.id, method_id))
        .ok_or(SignerError::MissingKey)
}

/// `did:web:x#key-1`, `#key-1` and `key-1` all name the same key.
fn key_id_matches(id: &str, reference: &str) -> bool {
    fn fragment(value: &str) -> &str {
        value.rsplit_once('#').map_or(value, |(_, fragment)| fragment)
    }

    id == reference || fragment(id) == fragment(reference)
}

#[cfg(test)]
mod test {
    use super::*;
    use mockall::predicate::*;
    use serde_json::json;
    use std::sync::Arc;

    use crate::common_models::{PublicKeyJwk, PublicKeyJwkEllipticData};
    use crate::crypto::MockSigner;
    use crate::did::error::DidMethodProviderError;
    use crate::did::model::{DidDocument, DidVerificationMethod};
    use crate::did::provider::MockDidMethodProvider;
    use crate::key_algorithm::provider::MockKeyAlgorithmProvider;
    use crate::key_algorithm::MockKeyAlgorithm;

    const DID: &str = "did:web:issuer.example";

    fn verification_method(key_id: &str) -> DidVerificationMethod {
        DidVerificationMethod {
            id: format!("{DID}#{key_id}"),
            r#type: "JsonWebKey2020".to_owned(),
            controller: DID.to_owned(),
            public_key_jwk: PublicKeyJwk::Ec(PublicKeyJwkEllipticData {
                r#use: None,
                crv: "P-256".to_owned(),
                x: format!("x-{key_id}"),
                y: Some(format!("y-{key_id}")),
            }),
        }
    }

    fn get_dummy_did_document() -> DidDocument {
        DidDocument {
            context: json!(["https://www.w3.org/ns/did/v1"]),
            id: DID.into(),
            verification_method: vec![verification_method("key-1"), verification_method("key-2")],
            authentication: Some(vec![format!("{DID}#key-1")]),
            assertion_method: Some(vec![format!("{DID}#key-2")]),
            service: None,
            rest: Default::default(),
        }
    }

    fn key_algorithm_provider(expected_x: &'static str, verified: bool) -> MockKeyAlgorithmProvider {
        let mut signer = MockSigner::default();
        signer
            .expect_verify()
            .with(
                eq("token".as_bytes()),
                eq(b"signature".as_slice()),
                eq(expected_x.as_bytes()),
            )
            .once()
            .returning(move |_, _, _| {
                if verified {
                    Ok(())
                } else {
                    Err(SignerError::InvalidSignature)
                }
            });
        let signer = Arc::new(signer);

        let mut key_alg = MockKeyAlgorithm::default();
        key_alg.expect_jwk_to_bytes().once().returning(|jwk| match jwk {
            PublicKeyJwk::Ec(data) | PublicKeyJwk::Okp(data) => Ok(data.x.as_bytes().to_vec()),
        });
        let key_alg = Arc::new(key_alg);

        let mut key_algorithm_provider = MockKeyAlgorithmProvider::default();
        key_algorithm_provider
            .expect_get_signer()
            .once()
            .withf(|alg| alg == "ES256")
            .returning(move |_| Ok(signer.clone()));
        key_algorithm_provider
            .expect_get_key_algorithm()
            .once()
            .withf(|alg| alg == "ES256")
            .returning(move |_| Some(key_alg.clone()));

        key_algorithm_provider
    }

    fn did_method_provider() -> MockDidMethodProvider {
        let mut did_method_provider = MockDidMethodProvider::default();
        did_method_provider
            .expect_resolve()
            .once()
            .returning(|_| Ok(get_dummy_did_document()));
        did_method_provider
    }

    #[tokio::test]
    async fn test_verify_success_with_first_role_key() {
        let verification = KeyVerification {
            key_algorithm_provider: Arc::new(key_algorithm_provider("x-key-1", true)),
            did_method_provider: Arc::new(did_method_provider()),
            key_role: KeyRole::Authentication,
        };

        let result = verification
            .verify(Some(DID.into()), None, "ES256", b"token", b"signature")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_verify_success_with_kid_fragment() {
        let verification = KeyVerification {
            key_algorithm_provider: Arc::new(key_algorithm_provider("x-key-2", true)),
            did_method_provider: Arc::new(did_method_provider()),
            key_role: KeyRole::AssertionMethod,
        };

        let result = verification
            .verify(Some(DID.into()), Some("#key-2"), "ES256", b"token", b"signature")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_verify_kid_outside_role_is_rejected() {
        let verification = KeyVerification {
            key_algorithm_provider: Arc::new(MockKeyAlgorithmProvider::default()),
            did_method_provider: Arc::new(did_method_provider()),
            key_role: KeyRole::AssertionMethod,
        };

        let result = verification
            .verify(
                Some(DID.into()),
                Some("did:web:issuer.example#key-1"),
                "ES256",
                b"token",
                b"signature",
            )
            .await;
        assert!(matches!(result, Err(SignerError::MissingKey)));
    }

    #[tokio::test]
    async fn test_verify_missing_issuer() {
        let verification = KeyVerification {
            key_algorithm_provider: Arc::new(MockKeyAlgorithmProvider::default()),
            did_method_provider: Arc::new(MockDidMethodProvider::default()),
            key_role: KeyRole::AssertionMethod,
        };

        let result = verification
            .verify(None, None, "ES256", b"token", b"signature")
            .await;
        assert!(matches!(result, Err(SignerError::Verification(_))));
    }

    #[tokio::test]
    async fn test_verify_did_resolution_failed() {
        let mut did_method_provider = MockDidMethodProvider::default();
        did_method_provider
            .expect_resolve()
            .once()
            .returning(|_| Err(DidMethodProviderError::MissingProvider("KEY".to_string())));

        let verification = KeyVerification {
            key_algorithm_provider: Arc::new(MockKeyAlgorithmProvider::default()),
            did_method_provider: Arc::new(did_method_provider),
            key_role: KeyRole::Authentication,
        };

        let result = verification
            .verify(
                Some(DidValue::from("did:key:z6Mk")),
                None,
                "ES256",
                b"token",
                b"signature",
            )
            .await;
        assert!(matches!(result, Err(SignerError::Verification(_))));
    }

    #[tokio::test]
    async fn test_verify_signature_verification_fails() {
        let verification = KeyVerification {
            key_algorithm_provider: Arc::new(key_algorithm_provider("x-key-1", false)),
            did_method_provider: Arc::new(did_method_provider()),
            key_role: KeyRole::Authentication,
        };

        let result = verification
            .verify(Some(DID.into()), Some("key-1"), "ES256", b"token", b"signature")
            .await;
        assert!(matches!(result, Err(SignerError::InvalidSignature)));
    }

    #[test]
    fn test_key_id_matches() {
        assert!(key_id_matches("did:web:a#key-1", "did:web:a#key-1"));
        assert!(key_id_matches("did:web:a#key-1", "#key-1"));
        assert!(key_id_matches("did:web:a#key-1", "key-1"));
        assert!(!key_id_matches("did:web:a#key-1", "key-2"));
    }
}
