use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map};

use super::{encoder::CredentialEncoder, with_requested_claims};
use crate::credential_generator::{
    error::GeneratorError,
    model::{CredentialContainer, CredentialGenerationContext},
    CredentialTypeGenerator,
};

pub const ORGANIZATION_CREDENTIAL_TYPE: &str = "OrganizationCredential";

pub struct OrganizationCredentialGenerator {
    encoder: Arc<CredentialEncoder>,
}

impl OrganizationCredentialGenerator {
    pub fn new(encoder: Arc<CredentialEncoder>) -> Self {
        Self { encoder }
    }
}

#[async_trait]
impl CredentialTypeGenerator for OrganizationCredentialGenerator {
    fn credential_type(&self) -> String {
        ORGANIZATION_CREDENTIAL_TYPE.to_owned()
    }

    async fn generate_credential(
        &self,
        context: &CredentialGenerationContext,
    ) -> Result<CredentialContainer, GeneratorError> {
        // The holder's participant id stands in until a name is requested.
        let mut defaults = Map::new();
        defaults.insert(
            "organizationName".to_owned(),
            json!(context.request.holder_pid()),
        );
        defaults.insert("organizationType".to_owned(), json!("Participant"));
        defaults.insert("status".to_owned(), json!("Active"));

        self.encoder
            .encode(
                context,
                ORGANIZATION_CREDENTIAL_TYPE,
                with_requested_claims(defaults, context),
            )
            .await
    }
}
