use thiserror::Error;

use crate::remote_entity_storage::RemoteEntityStorageError;

/// Failure of a single DID method.
#[derive(Debug, Error)]
pub enum DidMethodError {
    #[error("Malformed DID `{0}`")]
    InvalidDid(String),
    #[error("Fetching `{url}` failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Unusable DID document: {0}")]
    InvalidDocument(String),
}

#[derive(Debug, Error)]
pub enum DidMethodProviderError {
    #[error(transparent)]
    DidMethod(#[from] DidMethodError),
    #[error("DID value has no method")]
    MissingDidMethodNameInDidValue,
    #[error("No resolver registered for DID method `{0}`")]
    MissingProvider(String),
    #[error("DID document is not valid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("DID document cache: {0}")]
    RemoteEntityStorage(#[from] RemoteEntityStorageError),
}
