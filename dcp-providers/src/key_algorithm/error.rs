use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyAlgorithmProviderError {
    #[error("Unknown key algorithm `{0}`")]
    UnknownAlgorithm(String),
    #[error("No signer for key algorithm: {0}")]
    MissingSigner(String),
}

#[derive(Debug, Error)]
pub enum KeyAlgorithmError {
    #[error("Invalid public key: {0}")]
    InvalidKey(String),
}
