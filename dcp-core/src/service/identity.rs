//! The DID this connector acts as, and the key it signs with.

use std::sync::Arc;

use dcp_providers::{
    common_models::{did::DidValue, key::Key},
    credential_formatter::model::AuthenticationFn,
    credential_generator::imp::encoder::IssuerSigningKey,
    did::{imp::common::single_key_did_document, model::DidDocument},
    key_algorithm::provider::KeyAlgorithmProvider,
    key_storage::provider::KeyProvider,
};

use super::error::ServiceError;

pub struct ParticipantIdentity {
    pub did: DidValue,
    pub key: Key,
    /// Fragment of the verification method, e.g. `key-1`.
    pub key_id: String,
    pub credential_service_url: Option<String>,
    key_provider: Arc<dyn KeyProvider>,
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
}

impl ParticipantIdentity {
    pub fn new(
        did: DidValue,
        key: Key,
        key_id: impl Into<String>,
        credential_service_url: Option<String>,
        key_provider: Arc<dyn KeyProvider>,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    ) -> Self {
        Self {
            did,
            key,
            key_id: key_id.into(),
            credential_service_url,
            key_provider,
            key_algorithm_provider,
        }
    }

    pub fn key_reference(&self) -> String {
        self.did.key_reference(&self.key_id)
    }

    pub fn auth_fn(&self) -> Result<AuthenticationFn, ServiceError> {
        Ok(self
            .key_provider
            .get_signature_provider(&self.key, Some(self.key_reference()))?)
    }

    pub fn signing_key(&self) -> IssuerSigningKey {
        IssuerSigningKey {
            did: self.did.clone(),
            key: self.key.clone(),
            key_id: self.key_id.clone(),
        }
    }

    /// The document served at this DID's `did.json`.
    pub fn did_document(&self) -> Result<DidDocument, ServiceError> {
        let algorithm = self
            .key_algorithm_provider
            .get_key_algorithm(&self.key.key_type)
            .ok_or_else(|| {
                ServiceError::Internal(format!("missing key algorithm `{}`", self.key.key_type))
            })?;
        let jwk = algorithm
            .bytes_to_jwk(&self.key.public_key, None)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(single_key_did_document(
            &self.did,
            &self.key_id,
            jwk,
            self.credential_service_url.as_deref(),
        ))
    }
}
