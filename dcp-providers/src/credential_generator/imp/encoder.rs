use std::sync::Arc;

use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

use crate::{
    common_models::{did::DidValue, key::Key},
    credential_formatter::{
        model::CredentialData, profile::ProfileExtractor, provider::CredentialFormatterProvider,
    },
    credential_generator::{
        error::GeneratorError,
        model::{CredentialContainer, CredentialGenerationContext},
    },
    key_storage::provider::KeyProvider,
};

pub const DEFAULT_VALIDITY: Duration = Duration::days(365);

/// The issuer's DID and the key it signs credentials with.
#[derive(Debug, Clone)]
pub struct IssuerSigningKey {
    pub did: DidValue,
    pub key: Key,
    /// Fragment of the verification method in the issuer's DID document.
    pub key_id: String,
}

/// Signs generated claims with the formatter of the profile requested for the type.
pub struct CredentialEncoder {
    formatter_provider: Arc<dyn CredentialFormatterProvider>,
    key_provider: Arc<dyn KeyProvider>,
    signing_key: IssuerSigningKey,
    validity: Duration,
}

impl CredentialEncoder {
    pub fn new(
        formatter_provider: Arc<dyn CredentialFormatterProvider>,
        key_provider: Arc<dyn KeyProvider>,
        signing_key: IssuerSigningKey,
        validity: Duration,
    ) -> Self {
        Self {
            formatter_provider,
            key_provider,
            signing_key,
            validity,
        }
    }

    pub async fn encode(
        &self,
        context: &CredentialGenerationContext,
        credential_type: &str,
        claims: Map<String, Value>,
    ) -> Result<CredentialContainer, GeneratorError> {
        let profile = ProfileExtractor::extract(context.requested_claims.as_ref(), credential_type);
        let formatter = self
            .formatter_provider
            .get_formatter(profile)
            .ok_or(GeneratorError::MissingFormatter(profile))?;

        let auth_fn = self.key_provider.get_signature_provider(
            &self.signing_key.key,
            Some(self.signing_key.did.key_reference(&self.signing_key.key_id)),
        )?;

        let data = CredentialData {
            issuer_did: self.signing_key.did.to_owned(),
            holder_did: context.request.holder_did().to_owned(),
            credential_type: credential_type.to_owned(),
            claims,
            status: context.status.to_owned(),
            issuance_date: OffsetDateTime::now_utc(),
            valid_for: self.validity,
            schema: None,
        };

        let token = formatter.generate_jwt(data, auth_fn).await?;
        tracing::debug!(
            credential_type,
            %profile,
            holder = %context.request.holder_did(),
            "credential generated"
        );

        Ok(CredentialContainer::jwt(credential_type, token))
    }
}
