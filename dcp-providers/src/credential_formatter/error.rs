use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum FormatterError {
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Signature verification failed: {0}")]
    Verification(String),
    #[error("Token encoding failed: {0}")]
    Encoding(String),
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    #[error("Unexpected claims: {0}")]
    InvalidClaims(String),
}
