//! Map-backed stores for tests and the demo server.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    error::StorageError, ConsentStorage, CredentialRequestStorage, CredentialStorage,
    PresentationStorage,
};
use crate::{
    common_models::{credential::VerifiableCredential, did::DidValue},
    credential_generator::model::{CredentialRequest, CredentialRequestStatus},
    presentation::model::VerifiablePresentation,
    trust::model::ConsentRecord,
};

#[cfg(test)]
mod test;

#[derive(Default)]
pub struct InMemoryCredentialStorage {
    credentials: RwLock<HashMap<String, VerifiableCredential>>,
}

#[async_trait]
impl CredentialStorage for InMemoryCredentialStorage {
    async fn save(&self, credential: VerifiableCredential) -> Result<(), StorageError> {
        self.credentials
            .write()
            .await
            .insert(credential.id.to_owned(), credential);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<VerifiableCredential>, StorageError> {
        Ok(self.credentials.read().await.get(id).cloned())
    }

    async fn find_by_holder_and_types(
        &self,
        holder_did: &DidValue,
        credential_types: &[String],
    ) -> Result<Vec<VerifiableCredential>, StorageError> {
        let credentials = self.credentials.read().await;

        let mut found: Vec<VerifiableCredential> = credentials
            .values()
            .filter(|credential| &credential.holder_did == holder_did)
            .filter(|credential| credential_types.contains(&credential.credential_type))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.issuance_date.cmp(&b.issuance_date).then(a.id.cmp(&b.id)));

        Ok(found)
    }
}

#[derive(Default)]
pub struct InMemoryCredentialRequestStorage {
    requests: RwLock<HashMap<String, CredentialRequest>>,
}

#[async_trait]
impl CredentialRequestStorage for InMemoryCredentialRequestStorage {
    async fn save(&self, request: CredentialRequest) -> Result<(), StorageError> {
        self.requests
            .write()
            .await
            .insert(request.issuer_pid().to_owned(), request);
        Ok(())
    }

    async fn get(&self, issuer_pid: &str) -> Result<Option<CredentialRequest>, StorageError> {
        Ok(self.requests.read().await.get(issuer_pid).cloned())
    }

    async fn replace_if(
        &self,
        request: CredentialRequest,
        expected: CredentialRequestStatus,
    ) -> Result<bool, StorageError> {
        let mut requests = self.requests.write().await;
        match requests.get(request.issuer_pid()) {
            Some(current) if current.status() == expected => {
                requests.insert(request.issuer_pid().to_owned(), request);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryConsentStorage {
    consents: RwLock<HashMap<String, ConsentRecord>>,
}

#[async_trait]
impl ConsentStorage for InMemoryConsentStorage {
    async fn save(&self, consent: ConsentRecord) -> Result<(), StorageError> {
        self.consents
            .write()
            .await
            .insert(consent.id.to_owned(), consent);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ConsentRecord>, StorageError> {
        Ok(self.consents.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.consents.write().await.remove(id).is_some())
    }

    async fn find_by_holder(
        &self,
        holder_did: &DidValue,
    ) -> Result<Vec<ConsentRecord>, StorageError> {
        Ok(self
            .consents
            .read()
            .await
            .values()
            .filter(|consent| &consent.holder_did == holder_did)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryPresentationStorage {
    presentations: RwLock<HashMap<String, VerifiablePresentation>>,
}

#[async_trait]
impl PresentationStorage for InMemoryPresentationStorage {
    async fn save(&self, presentation: VerifiablePresentation) -> Result<(), StorageError> {
        self.presentations
            .write()
            .await
            .insert(presentation.id.to_owned(), presentation);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<VerifiablePresentation>, StorageError> {
        Ok(self.presentations.read().await.get(id).cloned())
    }
}
