//! Document storage used by the services. The store itself is external; these traits are
//! the operations the credential-trust layer relies on.

use async_trait::async_trait;

use self::error::StorageError;
use crate::{
    common_models::{credential::VerifiableCredential, did::DidValue},
    credential_generator::model::{CredentialRequest, CredentialRequestStatus},
    presentation::model::VerifiablePresentation,
    trust::model::ConsentRecord,
};

pub mod error;
pub mod in_memory;

/// Credentials received by a holder.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    async fn save(&self, credential: VerifiableCredential) -> Result<(), StorageError>;

    async fn get(&self, id: &str) -> Result<Option<VerifiableCredential>, StorageError>;

    /// Credentials of `holder_did` whose type is one of `credential_types`.
    async fn find_by_holder_and_types(
        &self,
        holder_did: &DidValue,
        credential_types: &[String],
    ) -> Result<Vec<VerifiableCredential>, StorageError>;
}

/// Credential requests received by an issuer, keyed by issuer pid.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CredentialRequestStorage: Send + Sync {
    /// Inserts or replaces.
    async fn save(&self, request: CredentialRequest) -> Result<(), StorageError>;

    async fn get(&self, issuer_pid: &str) -> Result<Option<CredentialRequest>, StorageError>;

    /// Replaces the stored request only while its status is still `expected`. Returns
    /// whether the write happened.
    async fn replace_if(
        &self,
        request: CredentialRequest,
        expected: CredentialRequestStatus,
    ) -> Result<bool, StorageError>;
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ConsentStorage: Send + Sync {
    async fn save(&self, consent: ConsentRecord) -> Result<(), StorageError>;

    async fn get(&self, id: &str) -> Result<Option<ConsentRecord>, StorageError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;

    async fn find_by_holder(&self, holder_did: &DidValue)
        -> Result<Vec<ConsentRecord>, StorageError>;
}

/// Presentations produced by a holder.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait PresentationStorage: Send + Sync {
    async fn save(&self, presentation: VerifiablePresentation) -> Result<(), StorageError>;

    async fn get(&self, id: &str) -> Result<Option<VerifiablePresentation>, StorageError>;
}
