use thiserror::Error;

use crate::{common_models::ValidationError, storage::error::StorageError};

#[derive(Debug, Error)]
pub enum TrustError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Consent `{0}` not found")]
    ConsentNotFound(String),
    #[error("Storage error: `{0}`")]
    Storage(#[from] StorageError),
}
