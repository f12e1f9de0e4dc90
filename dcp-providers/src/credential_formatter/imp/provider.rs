use std::{collections::HashMap, sync::Arc};

use crate::credential_formatter::{
    profile::ProfileId, provider::CredentialFormatterProvider, CredentialFormatter,
};

pub struct CredentialFormatterProviderImpl {
    formatters: HashMap<ProfileId, Arc<dyn CredentialFormatter>>,
}

impl CredentialFormatterProviderImpl {
    /// Registers every formatter under the profile it reports.
    pub fn new(formatters: Vec<Arc<dyn CredentialFormatter>>) -> Self {
        Self {
            formatters: formatters
                .into_iter()
                .map(|formatter| (formatter.get_profile(), formatter))
                .collect(),
        }
    }
}

impl CredentialFormatterProvider for CredentialFormatterProviderImpl {
    fn get_formatter(&self, profile: ProfileId) -> Option<Arc<dyn CredentialFormatter>> {
        self.formatters.get(&profile).cloned()
    }
}
