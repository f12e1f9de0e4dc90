use thiserror::Error;

use crate::{common_models::ValidationError, credential_formatter::error::FormatterError};

#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("Unsupported presentation format `{0}`")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Could not sign presentation: `{0}`")]
    Signing(String),
    #[error("Formatter error: `{0}`")]
    Formatter(#[from] FormatterError),
    #[error("Invalid presentation: `{0}`")]
    Invalid(String),
}
