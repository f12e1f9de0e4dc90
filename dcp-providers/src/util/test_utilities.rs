//! Participants with real ES256 keys for tests, here and in dependent crates.

use std::{collections::HashMap, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    common_models::{did::DidValue, key::Key},
    credential_formatter::model::AuthenticationFn,
    crypto::{imp::signer::es256::ES256Signer, imp::CryptoProviderImpl, Signer},
    did::{
        error::DidMethodProviderError, imp::common::single_key_did_document,
        model::DidDocument, provider::MockDidMethodProvider,
    },
    key_algorithm::{
        imp::{es256::Es256, provider::KeyAlgorithmProviderImpl},
        provider::KeyAlgorithmProvider,
        KeyAlgorithm,
    },
    key_storage::{
        imp::{internal::InternalKeyStorage, provider::KeyProviderImpl},
        provider::KeyProvider,
        KeyStorage,
    },
};

pub const KEY_ID: &str = "key-1";

pub fn es256_key_algorithm_provider() -> Arc<dyn KeyAlgorithmProvider> {
    Arc::new(KeyAlgorithmProviderImpl::new(
        HashMap::from([(
            "ES256".to_owned(),
            Arc::new(Es256) as Arc<dyn KeyAlgorithm>,
        )]),
        Arc::new(CryptoProviderImpl::new(HashMap::from([(
            "ES256".to_owned(),
            Arc::new(ES256Signer {}) as Arc<dyn Signer>,
        )]))),
    ))
}

/// A DID with one freshly generated ES256 key held in internal key storage.
pub struct TestIdentity {
    pub did: DidValue,
    pub key: Key,
    pub key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    pub key_provider: Arc<dyn KeyProvider>,
}

impl TestIdentity {
    pub fn new(did: &str) -> Self {
        let key_algorithm_provider = es256_key_algorithm_provider();
        let generated = Es256.generate_key_pair();

        let key = Key {
            id: Uuid::new_v4().into(),
            created_date: OffsetDateTime::now_utc(),
            public_key: generated.public,
            name: format!("{did} signing key"),
            key_reference: generated.private,
            storage_type: "INTERNAL".to_owned(),
            key_type: "ES256".to_owned(),
        };

        let key_provider = Arc::new(KeyProviderImpl::new(HashMap::from([(
            "INTERNAL".to_owned(),
            Arc::new(InternalKeyStorage::new(key_algorithm_provider.clone()))
                as Arc<dyn KeyStorage>,
        )])));

        Self {
            did: DidValue::from(did),
            key,
            key_algorithm_provider,
            key_provider,
        }
    }

    pub fn key_reference(&self) -> String {
        self.did.key_reference(KEY_ID)
    }

    pub fn auth_fn(&self) -> AuthenticationFn {
        self.key_provider
            .get_signature_provider(&self.key, Some(self.key_reference()))
            .expect("internal key storage is registered")
    }

    pub fn did_document(&self, credential_service_url: Option<&str>) -> DidDocument {
        let jwk = Es256
            .bytes_to_jwk(&self.key.public_key, None)
            .expect("generated key converts to JWK");

        single_key_did_document(&self.did, KEY_ID, jwk, credential_service_url)
    }
}

/// Resolves exactly the given documents; any other DID fails to resolve.
pub fn did_method_provider(documents: Vec<DidDocument>) -> MockDidMethodProvider {
    let documents: HashMap<DidValue, DidDocument> = documents
        .into_iter()
        .map(|document| (document.id.to_owned(), document))
        .collect();

    let mut did_method_provider = MockDidMethodProvider::default();
    did_method_provider.expect_resolve().returning(move |did| {
        documents
            .get(did)
            .cloned()
            .ok_or_else(|| DidMethodProviderError::MissingProvider(did.to_string()))
    });
    did_method_provider
}
