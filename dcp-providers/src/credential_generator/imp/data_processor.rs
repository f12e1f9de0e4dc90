use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map};

use super::{encoder::CredentialEncoder, with_requested_claims};
use crate::credential_generator::{
    error::GeneratorError,
    model::{CredentialContainer, CredentialGenerationContext},
    CredentialTypeGenerator,
};

pub const DATA_PROCESSOR_CREDENTIAL_TYPE: &str = "DataProcessorCredential";

/// Attests the level of data processing a participant has contracted for.
pub struct DataProcessorCredentialGenerator {
    encoder: Arc<CredentialEncoder>,
}

impl DataProcessorCredentialGenerator {
    pub fn new(encoder: Arc<CredentialEncoder>) -> Self {
        Self { encoder }
    }
}

#[async_trait]
impl CredentialTypeGenerator for DataProcessorCredentialGenerator {
    fn credential_type(&self) -> String {
        DATA_PROCESSOR_CREDENTIAL_TYPE.to_owned()
    }

    async fn generate_credential(
        &self,
        context: &CredentialGenerationContext,
    ) -> Result<CredentialContainer, GeneratorError> {
        let mut defaults = Map::new();
        defaults.insert("level".to_owned(), json!("processing"));
        defaults.insert("contractVersion".to_owned(), json!("1.0.0"));

        self.encoder
            .encode(
                context,
                DATA_PROCESSOR_CREDENTIAL_TYPE,
                with_requested_claims(defaults, context),
            )
            .await
    }
}
