use std::sync::Arc;

use super::{error::KeyStorageProviderError, imp::provider::StoredKeySigner, KeyStorage};
use crate::{common_models::key::Key, credential_formatter::model::AuthenticationFn};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait KeyProvider: Send + Sync {
    fn get_key_storage(&self, storage_type: &str) -> Option<Arc<dyn KeyStorage>>;

    /// JWS signer backed by the storage holding `key`. `key_reference` ends up as the
    /// `kid` header.
    fn get_signature_provider(
        &self,
        key: &Key,
        key_reference: Option<String>,
    ) -> Result<AuthenticationFn, KeyStorageProviderError> {
        let storage = self
            .get_key_storage(&key.storage_type)
            .ok_or_else(|| KeyStorageProviderError::UnknownStorage(key.storage_type.clone()))?;

        Ok(Box::new(StoredKeySigner {
            key: key.to_owned(),
            storage,
            key_reference,
        }))
    }
}
