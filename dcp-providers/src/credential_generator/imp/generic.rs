use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Map;

use super::{encoder::CredentialEncoder, with_requested_claims};
use crate::credential_generator::{
    error::GeneratorError,
    model::{CredentialContainer, CredentialGenerationContext},
    CredentialTypeGenerator,
};

/// Issues any credential type with exactly the requested claims.
pub struct GenericCredentialGenerator {
    credential_type: String,
    encoder: Arc<CredentialEncoder>,
}

impl GenericCredentialGenerator {
    pub fn new(credential_type: impl Into<String>, encoder: Arc<CredentialEncoder>) -> Self {
        Self {
            credential_type: credential_type.into(),
            encoder,
        }
    }
}

#[async_trait]
impl CredentialTypeGenerator for GenericCredentialGenerator {
    fn credential_type(&self) -> String {
        self.credential_type.to_owned()
    }

    async fn generate_credential(
        &self,
        context: &CredentialGenerationContext,
    ) -> Result<CredentialContainer, GeneratorError> {
        self.encoder
            .encode(
                context,
                &self.credential_type,
                with_requested_claims(Map::new(), context),
            )
            .await
    }
}
