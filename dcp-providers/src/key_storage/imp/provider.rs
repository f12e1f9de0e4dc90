use std::{collections::HashMap, sync::Arc};

use crate::{
    common_models::key::Key,
    credential_formatter::model::SignatureProvider,
    crypto::SignerError,
    key_storage::{provider::KeyProvider, KeyStorage},
};

/// Key storages by `Key::storage_type`.
pub struct KeyProviderImpl {
    storages: HashMap<String, Arc<dyn KeyStorage>>,
}

impl KeyProviderImpl {
    pub fn new(storages: HashMap<String, Arc<dyn KeyStorage>>) -> Self {
        Self { storages }
    }
}

impl KeyProvider for KeyProviderImpl {
    fn get_key_storage(&self, storage_type: &str) -> Option<Arc<dyn KeyStorage>> {
        self.storages.get(storage_type).cloned()
    }
}

pub(crate) struct StoredKeySigner {
    pub storage: Arc<dyn KeyStorage>,
    pub key: Key,
    pub key_reference: Option<String>,
}

#[async_trait::async_trait]
impl SignatureProvider for StoredKeySigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.storage.sign(&self.key, message).await
    }

    fn get_key_id(&self) -> Option<String> {
        self.key_reference.clone()
    }

    fn get_public_key(&self) -> Vec<u8> {
        self.key.public_key.clone()
    }
}
