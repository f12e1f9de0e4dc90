use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyStorageProviderError {
    #[error("No key storage `{0}` registered")]
    UnknownStorage(String),
}

#[derive(Debug, Error)]
pub enum KeyStorageError {
    #[error("Key algorithm `{0}` is not supported by this storage")]
    UnsupportedAlgorithm(String),
}
