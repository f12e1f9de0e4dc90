//! DID resolution. Every participant is identified by a `did:web` DID whose document
//! carries the keys that verify its credentials and tokens, and for holders the
//! `CredentialService` endpoint that verifiers and issuers talk to.

use async_trait::async_trait;

use crate::{
    common_models::did::DidValue,
    did::{error::DidMethodError, model::DidDocument},
};

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;

/// Resolves DIDs of one method.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DidMethod: Send + Sync {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodError>;
}
