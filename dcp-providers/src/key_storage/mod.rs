//! Storage of the connector's own private keys. Signing happens inside the storage so the
//! private key never leaves it.

use crate::{common_models::key::Key, crypto::SignerError};

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait KeyStorage: Send + Sync {
    /// New key pair of `key_type`. The returned reference is what `sign` later receives
    /// as [`Key::key_reference`].
    fn generate(&self, key_type: &str) -> Result<model::StorageGeneratedKey, error::KeyStorageError>;

    async fn sign(&self, key: &Key, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}
