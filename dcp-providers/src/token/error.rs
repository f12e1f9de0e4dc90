use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Malformed token: `{0}`")]
    Malformed(String),
    #[error("Missing claim `{0}`")]
    MissingClaim(&'static str),
    #[error("Issuer `{issuer}` does not match subject `{subject}`")]
    IssuerSubjectMismatch { issuer: String, subject: String },
    #[error("Token is not addressed to `{expected}`")]
    AudienceMismatch { expected: String },
    #[error("Token expired")]
    Expired,
    #[error("Invalid signature: `{0}`")]
    InvalidSignature(String),
    #[error("Could not sign token: `{0}`")]
    Signing(String),
}
