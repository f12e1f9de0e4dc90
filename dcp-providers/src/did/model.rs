//! `struct`s and `enum`s for DID method provider.

use crate::common_models::{did::DidValue, PublicKeyJwk};

/// Service type under which a holder publishes its credential endpoint.
pub const CREDENTIAL_SERVICE_TYPE: &str = "CredentialService";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DidDocument {
    pub context: serde_json::Value,
    pub id: DidValue,
    pub verification_method: Vec<DidVerificationMethod>,
    pub authentication: Option<Vec<String>>,
    pub assertion_method: Option<Vec<String>>,
    pub service: Option<Vec<DidService>>,

    pub rest: serde_json::Value,
}

impl DidDocument {
    /// First service entry of the given type.
    pub fn find_service(&self, r#type: &str) -> Option<&DidService> {
        self.service
            .as_ref()?
            .iter()
            .find(|service| service.r#type == r#type)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DidVerificationMethod {
    pub id: String,
    pub r#type: String,
    pub controller: String,
    pub public_key_jwk: PublicKeyJwk,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DidService {
    pub id: String,
    pub r#type: String,
    pub service_endpoint: String,
}
