use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::InternalKeyStorage;
use crate::{
    common_models::key::Key,
    crypto::MockSigner,
    key_algorithm::{
        error::KeyAlgorithmProviderError, model::GeneratedKey,
        provider::MockKeyAlgorithmProvider, MockKeyAlgorithm,
    },
    key_storage::{error::KeyStorageError, KeyStorage},
};

fn dummy_key() -> Key {
    Key {
        id: Uuid::new_v4().into(),
        created_date: OffsetDateTime::now_utc(),
        public_key: vec![1],
        name: "did:web:issuer.example signing key".to_owned(),
        key_reference: Zeroizing::new(vec![1, 2, 3]),
        storage_type: "INTERNAL".to_owned(),
        key_type: "ES256".to_owned(),
    }
}

#[test]
fn test_internal_generate() {
    let mut mock_key_algorithm = MockKeyAlgorithm::default();
    mock_key_algorithm
        .expect_generate_key_pair()
        .times(1)
        .returning(|| GeneratedKey {
            public: vec![1],
            private: Zeroizing::new(vec![1, 2, 3]),
        });

    let arc = Arc::new(mock_key_algorithm);

    let mut mock_key_algorithm_provider = MockKeyAlgorithmProvider::default();
    mock_key_algorithm_provider
        .expect_get_key_algorithm()
        .withf(|alg| alg == "ES256")
        .times(1)
        .returning(move |_| Some(arc.clone()));

    let storage = InternalKeyStorage::new(Arc::new(mock_key_algorithm_provider));

    let generated = storage.generate("ES256").unwrap();
    assert_eq!(vec![1], generated.public_key);
    assert_eq!(*generated.key_reference, vec![1, 2, 3]);
}

#[test]
fn test_internal_generate_unknown_algorithm() {
    let mut mock_key_algorithm_provider = MockKeyAlgorithmProvider::default();
    mock_key_algorithm_provider
        .expect_get_key_algorithm()
        .returning(|_| None);

    let storage = InternalKeyStorage::new(Arc::new(mock_key_algorithm_provider));

    let result = storage.generate("RSA");
    assert!(matches!(result, Err(KeyStorageError::UnsupportedAlgorithm(alg)) if alg == "RSA"));
}

#[tokio::test]
async fn test_internal_sign() {
    let mut mock_signer = MockSigner::default();
    mock_signer
        .expect_sign()
        .withf(|message, public_key, private_key| {
            message == b"message" && public_key == [1] && private_key == [1, 2, 3]
        })
        .times(1)
        .returning(|_, _, _| Ok(vec![9, 9]));

    let signer = Arc::new(mock_signer);
    let mut mock_key_algorithm_provider = MockKeyAlgorithmProvider::default();
    mock_key_algorithm_provider
        .expect_get_signer()
        .times(1)
        .returning(move |_| Ok(signer.clone()));

    let storage = InternalKeyStorage::new(Arc::new(mock_key_algorithm_provider));

    let signature = storage.sign(&dummy_key(), b"message").await.unwrap();
    assert_eq!(vec![9, 9], signature);
}

#[tokio::test]
async fn test_internal_sign_missing_signer() {
    let mut mock_key_algorithm_provider = MockKeyAlgorithmProvider::default();
    mock_key_algorithm_provider
        .expect_get_signer()
        .returning(|alg| {
            Err(KeyAlgorithmProviderError::UnknownAlgorithm(
                alg.to_owned(),
            ))
        });

    let storage = InternalKeyStorage::new(Arc::new(mock_key_algorithm_provider));

    let result = storage.sign(&dummy_key(), b"message").await;
    assert!(result.is_err());
}
