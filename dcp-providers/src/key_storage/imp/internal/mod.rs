//! Software key storage. The key reference is the raw private key.

use std::sync::Arc;

use crate::{
    common_models::key::Key,
    crypto::SignerError,
    key_algorithm::provider::KeyAlgorithmProvider,
    key_storage::{error::KeyStorageError, model::StorageGeneratedKey, KeyStorage},
};

#[cfg(test)]
mod test;

pub struct InternalKeyStorage {
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
}

impl InternalKeyStorage {
    pub fn new(key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>) -> Self {
        Self {
            key_algorithm_provider,
        }
    }
}

#[async_trait::async_trait]
impl KeyStorage for InternalKeyStorage {
    fn generate(&self, key_type: &str) -> Result<StorageGeneratedKey, KeyStorageError> {
        let algorithm = self
            .key_algorithm_provider
            .get_key_algorithm(key_type)
            .ok_or_else(|| KeyStorageError::UnsupportedAlgorithm(key_type.to_owned()))?;

        let key_pair = algorithm.generate_key_pair();
        Ok(StorageGeneratedKey {
            public_key: key_pair.public,
            key_reference: key_pair.private,
        })
    }

    async fn sign(&self, key: &Key, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        let signer = self
            .key_algorithm_provider
            .get_signer(&key.key_type)
            .map_err(|e| SignerError::MissingAlgorithm(e.to_string()))?;

        signer.sign(message, &key.public_key, &key.key_reference)
    }
}
