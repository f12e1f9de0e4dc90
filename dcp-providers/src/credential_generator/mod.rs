//! Credential generation per credential type.
//!
//! A [`CredentialTypeGenerator`] decides the claims of one credential type; the structural
//! encoding is left to the formatter of the profile selected for that type.

use async_trait::async_trait;

use self::{
    error::GeneratorError,
    model::{CredentialContainer, CredentialGenerationContext},
};

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CredentialTypeGenerator: Send + Sync {
    fn credential_type(&self) -> String;

    async fn generate_credential(
        &self,
        context: &CredentialGenerationContext,
    ) -> Result<CredentialContainer, GeneratorError>;
}
