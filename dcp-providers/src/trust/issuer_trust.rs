use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::common_models::did::DidValue;

/// Trusted issuer DIDs per credential type.
#[derive(Default)]
pub struct IssuerTrustService {
    trusted: RwLock<HashMap<String, HashSet<DidValue>>>,
}

impl IssuerTrustService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_trust(&self, credential_type: &str, issuer: DidValue) {
        tracing::debug!(credential_type, %issuer, "issuer trusted");
        self.trusted
            .write()
            .entry(credential_type.to_owned())
            .or_default()
            .insert(issuer);
    }

    /// Returns whether the issuer was trusted before.
    pub fn remove_trust(&self, credential_type: &str, issuer: &DidValue) -> bool {
        let mut trusted = self.trusted.write();

        let Some(issuers) = trusted.get_mut(credential_type) else {
            return false;
        };
        let removed = issuers.remove(issuer);
        if issuers.is_empty() {
            trusted.remove(credential_type);
        }
        removed
    }

    pub fn is_trusted(&self, credential_type: Option<&str>, issuer: Option<&DidValue>) -> bool {
        let (Some(credential_type), Some(issuer)) = (credential_type, issuer) else {
            return false;
        };

        self.trusted
            .read()
            .get(credential_type)
            .is_some_and(|issuers| issuers.contains(issuer))
    }

    pub fn trusted_issuers(&self, credential_type: &str) -> Vec<DidValue> {
        self.trusted
            .read()
            .get(credential_type)
            .map(|issuers| issuers.iter().cloned().collect())
            .unwrap_or_default()
    }
}
