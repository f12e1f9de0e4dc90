//! Signing and verifying of raw bytes.
//!
//! Every signature produced in the credential-trust layer (credential JWTs, presentation
//! JWTs, detached JWS proofs, self-issued ID tokens) passes through a [`Signer`] looked up
//! from the [`CryptoProvider`]. Keeping the primitives in their own crate leaves the
//! provider crate free of curve arithmetic.

use std::sync::Arc;

use thiserror::Error;

pub mod imp;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CryptoProviderError {
    #[error("No signer registered for `{0}`")]
    MissingSigner(String),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("Invalid key material: {0}")]
    InvalidKey(String),
    #[error("Private key does not belong to the given public key")]
    KeyPairMismatch,
    #[error("Signature does not verify")]
    InvalidSignature,
    #[error("Verification not possible: {0}")]
    Verification(String),
    #[error("No signer for key algorithm `{0}`")]
    MissingAlgorithm(String),
    #[error("Signing key not found")]
    MissingKey,
}

/// Direct signing and verification of raw bytes.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError>;

    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError>;
}

/// Returns signer instances by algorithm id (e.g. `ES256`).
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CryptoProvider: Send + Sync {
    fn get_signer(&self, signer: &str) -> Result<Arc<dyn Signer>, CryptoProviderError>;
}
