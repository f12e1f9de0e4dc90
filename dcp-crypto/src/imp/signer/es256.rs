use p256::{
    ecdsa::{
        signature::{Signer as _, Verifier as _},
        Signature, SigningKey, VerifyingKey,
    },
    EncodedPoint,
};
use rand::thread_rng;

use crate::{Signer, SignerError};

/// ECDSA over P-256 with SHA-256, producing the fixed 64-byte `r || s` encoding used by JWS.
pub struct ES256Signer {}

impl ES256Signer {
    /// Returns `(private, public)`; the public key is SEC1 compressed.
    pub fn random() -> (Vec<u8>, Vec<u8>) {
        let signing_key = SigningKey::random(&mut thread_rng());
        let public_key = compressed(&VerifyingKey::from(&signing_key));
        (signing_key.to_bytes().to_vec(), public_key)
    }
}

fn verifying_key(public_key: &[u8]) -> Result<VerifyingKey, SignerError> {
    EncodedPoint::from_bytes(public_key)
        .ok()
        .and_then(|point| VerifyingKey::from_encoded_point(&point).ok())
        .ok_or_else(|| SignerError::InvalidKey("not a P-256 public key".to_owned()))
}

fn compressed(key: &VerifyingKey) -> Vec<u8> {
    key.to_encoded_point(true).as_bytes().to_vec()
}

impl Signer for ES256Signer {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        let signing_key = SigningKey::from_slice(private_key)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;

        // public keys may arrive compressed or uncompressed
        if compressed(signing_key.verifying_key()) != compressed(&verifying_key(public_key)?) {
            return Err(SignerError::KeyPairMismatch);
        }

        let signature: Signature = signing_key.sign(input);
        Ok(signature.to_vec())
    }

    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError> {
        let key = verifying_key(public_key)?;
        let signature = Signature::try_from(signature).map_err(|_| SignerError::InvalidSignature)?;

        key.verify(input, &signature)
            .map_err(|_| SignerError::InvalidSignature)
    }
}
