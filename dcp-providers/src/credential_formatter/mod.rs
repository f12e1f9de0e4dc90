//! Credential formatting, parsing and signing.
//!
//! One formatter exists per [credential profile](profile::ProfileId). Both emit compact ES256
//! JWTs but lay out the credential differently inside the payload.

use async_trait::async_trait;
use error::FormatterError;
use model::{AuthenticationFn, CredentialData, DetailCredential, VerificationFn};
use profile::ProfileId;

pub mod error;
pub mod imp;
pub mod model;
pub mod profile;
pub mod provider;

/// Format credentials for sharing and parse credentials which have been shared.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CredentialFormatter: Send + Sync {
    /// Structural profile produced and accepted by this formatter.
    fn get_profile(&self) -> ProfileId;

    /// Formats and signs a credential for `credential.holder_did`.
    async fn generate_jwt(
        &self,
        credential: CredentialData,
        auth_fn: AuthenticationFn,
    ) -> Result<String, FormatterError>;

    /// Parses a received credential and verifies the signature.
    async fn extract_credential(
        &self,
        token: &str,
        verification: VerificationFn,
    ) -> Result<DetailCredential, FormatterError>;

    /// Parses a received credential without verifying the signature.
    async fn extract_credential_unverified(
        &self,
        token: &str,
    ) -> Result<DetailCredential, FormatterError>;

    /// Returns the leeway time.
    ///
    /// Leeway is a buffer time (in seconds) added to account for clock skew
    /// between systems when validating issuance and expiration dates.
    fn get_leeway(&self) -> u64;
}
