use std::sync::Arc;

use super::{profile::ProfileId, CredentialFormatter};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CredentialFormatterProvider: Send + Sync {
    fn get_formatter(&self, profile: ProfileId) -> Option<Arc<dyn CredentialFormatter>>;
}
