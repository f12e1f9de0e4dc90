//! Resolves DIDs to their documents and publishes this participant's own document.

use std::sync::Arc;

use dcp_providers::{
    common_models::did::DidValue,
    did::{
        error::DidMethodProviderError,
        imp::dto::DidDocumentDTO,
        model::{DidDocument, CREDENTIAL_SERVICE_TYPE},
        provider::DidMethodProvider,
    },
};
use thiserror::Error;

use super::{error::ServiceError, identity::ParticipantIdentity};

#[derive(Debug, Error)]
pub enum EndpointLookupError {
    #[error("Could not resolve `{did}`: {source}")]
    Resolution {
        did: DidValue,
        source: DidMethodProviderError,
    },
    #[error("DID document of `{0}` lists no services")]
    NoServices(DidValue),
    #[error("DID document of `{0}` has no `CredentialService` entry")]
    NoCredentialService(DidValue),
}

pub struct DidService {
    did_method_provider: Arc<dyn DidMethodProvider>,
    identity: Arc<ParticipantIdentity>,
}

impl DidService {
    pub fn new(
        did_method_provider: Arc<dyn DidMethodProvider>,
        identity: Arc<ParticipantIdentity>,
    ) -> Self {
        Self {
            did_method_provider,
            identity,
        }
    }

    pub async fn resolve_did(&self, did: &DidValue) -> Result<DidDocument, ServiceError> {
        Ok(self.did_method_provider.resolve(did).await?)
    }

    /// Endpoint of the `CredentialService` published by `did`.
    pub async fn credential_service_url(
        &self,
        did: &DidValue,
    ) -> Result<String, EndpointLookupError> {
        let document = self
            .did_method_provider
            .resolve(did)
            .await
            .map_err(|source| EndpointLookupError::Resolution {
                did: did.clone(),
                source,
            })?;

        if document.service.as_ref().map_or(true, Vec::is_empty) {
            return Err(EndpointLookupError::NoServices(did.clone()));
        }

        document
            .find_service(CREDENTIAL_SERVICE_TYPE)
            .map(|service| service.service_endpoint.to_owned())
            .ok_or_else(|| EndpointLookupError::NoCredentialService(did.clone()))
    }

    pub fn own_did_document(&self) -> Result<DidDocumentDTO, ServiceError> {
        Ok(self.identity.did_document()?.into())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use dcp_providers::did::model::DidService as DidServiceEntry;
    use dcp_providers::util::test_utilities::{did_method_provider, TestIdentity};

    use super::*;
    use crate::service::test_utilities::{participant, HOLDER, ISSUER, VERIFIER};

    fn service(documents: Vec<DidDocument>) -> DidService {
        let own = TestIdentity::new(VERIFIER);
        DidService::new(
            Arc::new(did_method_provider(documents)),
            participant(&own, None),
        )
    }

    #[tokio::test]
    async fn test_resolve_did() {
        let holder = TestIdentity::new(HOLDER);
        let service = service(vec![holder.did_document(None)]);

        let document = service.resolve_did(&holder.did).await.unwrap();
        assert_eq!(document.id, holder.did);

        assert!(matches!(
            service.resolve_did(&DidValue::from(ISSUER)).await,
            Err(ServiceError::DidResolutionFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_credential_service_url() {
        let holder = TestIdentity::new(HOLDER);
        let service = service(vec![holder.did_document(Some("https://holder.example/dcp"))]);

        let url = service
            .credential_service_url(&DidValue::from(HOLDER))
            .await
            .unwrap();
        assert_eq!(url, "https://holder.example/dcp");
    }

    #[tokio::test]
    async fn test_credential_service_url_distinguishes_failures() {
        let without_services = TestIdentity::new(HOLDER);
        let other = TestIdentity::new("did:web:other.example");
        let mut other_services = other.did_document(None);
        other_services.service = Some(vec![DidServiceEntry {
            id: "did:web:other.example#hub".to_owned(),
            r#type: "IdentityHub".to_owned(),
            service_endpoint: "https://other.example/hub".to_owned(),
        }]);

        let service = service(vec![without_services.did_document(None), other_services]);

        assert!(matches!(
            service
                .credential_service_url(&DidValue::from("did:web:unknown.example"))
                .await,
            Err(EndpointLookupError::Resolution { .. })
        ));
        assert!(matches!(
            service.credential_service_url(&DidValue::from(HOLDER)).await,
            Err(EndpointLookupError::NoServices(_))
        ));
        assert!(matches!(
            service
                .credential_service_url(&DidValue::from("did:web:other.example"))
                .await,
            Err(EndpointLookupError::NoCredentialService(_))
        ));
    }

    #[test]
    fn test_own_did_document() {
        let own = TestIdentity::new(ISSUER);
        let service = DidService::new(
            Arc::new(did_method_provider(vec![])),
            participant(&own, Some("https://issuer.example/dcp")),
        );

        let document = serde_json::to_value(service.own_did_document().unwrap()).unwrap();

        assert_eq!(document["id"], ISSUER);
        assert_eq!(
            document["verificationMethod"][0]["id"],
            "did:web:issuer.example#key-1"
        );
        assert_eq!(document["verificationMethod"][0]["publicKeyJwk"]["kty"], "EC");
        assert_eq!(document["verificationMethod"][0]["publicKeyJwk"]["crv"], "P-256");
        assert_eq!(document["assertionMethod"][0], "did:web:issuer.example#key-1");
        assert_eq!(document["service"][0]["type"], "CredentialService");
        assert_eq!(
            document["service"][0]["serviceEndpoint"],
            "https://issuer.example/dcp"
        );
    }
}
