use crate::{
    common_models::did::DidValue,
    did::{error::DidMethodProviderError, model::DidDocument},
};

/// Entry point for DID resolution; picks the DID method from the DID value.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait DidMethodProvider: Send + Sync {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodProviderError>;
}
