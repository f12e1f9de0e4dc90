use thiserror::Error;

use crate::{
    credential_formatter::{error::FormatterError, profile::ProfileId},
    key_storage::error::KeyStorageProviderError,
};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("No formatter registered for profile {0}")]
    MissingFormatter(ProfileId),
    #[error("Key storage error: `{0}`")]
    KeyStorage(#[from] KeyStorageProviderError),
    #[error("Formatter error: `{0}`")]
    Formatter(#[from] FormatterError),
}
