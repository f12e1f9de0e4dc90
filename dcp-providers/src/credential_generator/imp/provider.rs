use std::{collections::HashMap, sync::Arc};

use super::{
    data_processor::DataProcessorCredentialGenerator, encoder::CredentialEncoder,
    generic::GenericCredentialGenerator, membership::MembershipCredentialGenerator,
    organization::OrganizationCredentialGenerator,
};
use crate::credential_generator::{provider::CredentialGeneratorProvider, CredentialTypeGenerator};

pub struct CredentialGeneratorProviderImpl {
    generators: HashMap<String, Arc<dyn CredentialTypeGenerator>>,
    encoder: Arc<CredentialEncoder>,
}

impl CredentialGeneratorProviderImpl {
    /// Registers each generator under the type it reports.
    pub fn new(
        generators: Vec<Arc<dyn CredentialTypeGenerator>>,
        encoder: Arc<CredentialEncoder>,
    ) -> Self {
        Self {
            generators: generators
                .into_iter()
                .map(|generator| (generator.credential_type(), generator))
                .collect(),
            encoder,
        }
    }

    /// Membership, organization and data processor generators.
    pub fn with_builtin_generators(encoder: Arc<CredentialEncoder>) -> Self {
        Self::new(
            vec![
                Arc::new(MembershipCredentialGenerator::new(encoder.clone())),
                Arc::new(OrganizationCredentialGenerator::new(encoder.clone())),
                Arc::new(DataProcessorCredentialGenerator::new(encoder.clone())),
            ],
            encoder,
        )
    }
}

impl CredentialGeneratorProvider for CredentialGeneratorProviderImpl {
    fn get_generator(&self, credential_type: &str) -> Arc<dyn CredentialTypeGenerator> {
        match self.generators.get(credential_type) {
            Some(generator) => generator.clone(),
            None => {
                tracing::debug!(credential_type, "no dedicated generator, using generic");
                Arc::new(GenericCredentialGenerator::new(
                    credential_type,
                    self.encoder.clone(),
                ))
            }
        }
    }
}
