use dcp_providers::{
    common_models::ValidationError,
    credential_formatter::error::FormatterError,
    credential_generator::error::GeneratorError,
    did::error::DidMethodProviderError,
    http_client,
    key_storage::error::KeyStorageProviderError,
    presentation::error::PresentationError,
    revocation::error::RevocationError,
    storage::error::StorageError,
    token::error::TokenError,
    trust::error::TrustError,
};
use thiserror::Error;

use super::{did_service::EndpointLookupError, verifier_service::VerifierError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),
    #[error("Not authorized: {0}")]
    AuthorizationFailure(String),
    #[error("Rate limit exceeded for `{0}`")]
    RateLimited(String),
    #[error("Not found: {0}")]
    ResourceNotFound(String),
    #[error("Validation failed: {0}")]
    ValidationFailure(String),
    #[error("Status list fetch failed: {0}")]
    RevocationFetchFailure(String),
    #[error("Invalid status list: {0}")]
    RevocationFormatFailure(String),
    #[error("DID resolution failed: {0}")]
    DidResolutionFailure(String),
    #[error("Unsupported format `{0}`")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Verifier(#[from] VerifierError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for ServiceError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Signing(reason) => Self::Internal(reason),
            other => Self::AuthenticationFailure(other.to_string()),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        Self::ValidationFailure(error.0)
    }
}

impl From<StorageError> for ServiceError {
    fn from(error: StorageError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<TrustError> for ServiceError {
    fn from(error: TrustError) -> Self {
        match error {
            TrustError::Validation(error) => error.into(),
            TrustError::ConsentNotFound(id) => Self::ResourceNotFound(format!("consent `{id}`")),
            TrustError::Storage(error) => error.into(),
        }
    }
}

impl From<GeneratorError> for ServiceError {
    fn from(error: GeneratorError) -> Self {
        match error {
            GeneratorError::MissingFormatter(profile) => {
                Self::UnsupportedFormat(profile.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<PresentationError> for ServiceError {
    fn from(error: PresentationError) -> Self {
        match error {
            PresentationError::UnsupportedFormat(format) => Self::UnsupportedFormat(format),
            PresentationError::Validation(error) => error.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<RevocationError> for ServiceError {
    fn from(error: RevocationError) -> Self {
        match error {
            RevocationError::Fetch { .. } => Self::RevocationFetchFailure(error.to_string()),
            RevocationError::Format { .. } => Self::RevocationFormatFailure(error.to_string()),
        }
    }
}

impl From<DidMethodProviderError> for ServiceError {
    fn from(error: DidMethodProviderError) -> Self {
        Self::DidResolutionFailure(error.to_string())
    }
}

impl From<EndpointLookupError> for ServiceError {
    fn from(error: EndpointLookupError) -> Self {
        Self::DidResolutionFailure(error.to_string())
    }
}

impl From<KeyStorageProviderError> for ServiceError {
    fn from(error: KeyStorageProviderError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<FormatterError> for ServiceError {
    fn from(error: FormatterError) -> Self {
        Self::ValidationFailure(error.to_string())
    }
}

impl From<http_client::Error> for ServiceError {
    fn from(error: http_client::Error) -> Self {
        Self::Internal(error.to_string())
    }
}
