//! Revocation checking against published status lists.
//!
//! A credential is revoked when the bit at its `statusListIndex` is set in the list referenced
//! by `statusListCredential`. Both StatusList2021 (VC 1.1) and Bitstring Status List (VC 2.0)
//! entries share that layout and are handled by the same service.

use crate::revocation::error::RevocationError;

pub mod error;
pub mod imp;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait RevocationService: Send + Sync {
    /// Checks the `credentialStatus` of a credential JSON object.
    ///
    /// Credentials without a usable status entry are reported as not revoked.
    async fn is_revoked(&self, credential: &serde_json::Value) -> Result<bool, RevocationError>;
}
