use std::sync::Arc;

use super::CredentialTypeGenerator;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CredentialGeneratorProvider: Send + Sync {
    /// Generator registered for `credential_type`; unknown types get the generic one.
    fn get_generator(&self, credential_type: &str) -> Arc<dyn CredentialTypeGenerator>;
}
