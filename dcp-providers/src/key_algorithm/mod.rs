//! Key algorithm representations: generating key pairs and converting public keys between
//! raw bytes and JWK, as published in DID documents.

use error::KeyAlgorithmError;
use model::GeneratedKey;

use crate::common_models::PublicKeyJwk;

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait KeyAlgorithm: Send + Sync {
    /// Id of the crypto signer that signs with keys of this algorithm.
    fn signer_id(&self) -> String;

    fn generate_key_pair(&self) -> GeneratedKey;

    /// Public key as published in a DID document verification method.
    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError>;

    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError>;
}
