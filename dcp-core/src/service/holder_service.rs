//! Holder side: receiving issued credentials and answering presentation queries.

use std::sync::Arc;

use dcp_providers::{
    common_models::{
        credential::VerifiableCredential,
        did::{DidValue, KeyRole},
    },
    credential_formatter::{profile::ProfileId, provider::CredentialFormatterProvider},
    credential_generator::model::{CredentialContainer, CredentialRequestStatus},
    did::provider::DidMethodProvider,
    key_algorithm::provider::KeyAlgorithmProvider,
    presentation::{
        model::{PresentationQueryMessage, PresentationResponseMessage, VerifiablePresentation},
        rate_limiter::PresentationRateLimiter,
        signer::VerifiablePresentationSigner,
    },
    revocation::RevocationService,
    storage::{CredentialStorage, PresentationStorage},
    token::{
        imp::{access_token::create_access_token, self_issued::create_self_issued_token},
        TokenValidator,
    },
    trust::{consent::ConsentService, model::ConsentRecord},
    util::key_verification::KeyVerification,
};
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::{error::ServiceError, identity::ParticipantIdentity};
use crate::model::CredentialMessage;


/// Signing and token settings of the holder.
#[derive(Debug, Clone)]
pub struct HolderSettings {
    /// `jwt` or `json-ld`.
    pub presentation_format: String,
    pub token_validity: Duration,
}

pub struct HolderService {
    identity: Arc<ParticipantIdentity>,
    token_validator: Arc<dyn TokenValidator>,
    rate_limiter: Arc<PresentationRateLimiter>,
    consent: Arc<ConsentService>,
    credentials: Arc<dyn CredentialStorage>,
    presentations: Arc<dyn PresentationStorage>,
    revocation: Arc<dyn RevocationService>,
    formatter_provider: Arc<dyn CredentialFormatterProvider>,
    did_method_provider: Arc<dyn DidMethodProvider>,
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    signer: VerifiablePresentationSigner,
    settings: HolderSettings,
}

impl HolderService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Arc<ParticipantIdentity>,
        token_validator: Arc<dyn TokenValidator>,
        rate_limiter: Arc<PresentationRateLimiter>,
        consent: Arc<ConsentService>,
        credentials: Arc<dyn CredentialStorage>,
        presentations: Arc<dyn PresentationStorage>,
        revocation: Arc<dyn RevocationService>,
        formatter_provider: Arc<dyn CredentialFormatterProvider>,
        did_method_provider: Arc<dyn DidMethodProvider>,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
        settings: HolderSettings,
    ) -> Self {
        Self {
            identity,
            token_validator,
            rate_limiter,
            consent,
            credentials,
            presentations,
            revocation,
            formatter_provider,
            did_method_provider,
            key_algorithm_provider,
            signer: VerifiablePresentationSigner,
            settings,
        }
    }

    pub fn did(&self) -> &DidValue {
        &self.identity.did
    }

    /// Verifies and stores the credentials of an issuer's `CredentialMessage`. Nothing is
    /// stored unless every credential verifies.
    pub async fn receive_credentials(
        &self,
        bearer_token: &str,
        message: CredentialMessage,
    ) -> Result<Vec<VerifiableCredential>, ServiceError> {
        let context = self
            .token_validator
            .validate(bearer_token, self.identity.did.as_str())
            .await?;
        let issuer_did = context.issuer;

        match message.status {
            CredentialRequestStatus::Issued => {}
            CredentialRequestStatus::Rejected => {
                tracing::info!(
                    issuer = %issuer_did,
                    holder_pid = %message.holder_pid,
                    reason = ?message.rejection_reason,
                    "credential request rejected by issuer"
                );
                return Ok(vec![]);
            }
            CredentialRequestStatus::Pending => {
                return Err(ServiceError::ValidationFailure(
                    "credential message must be ISSUED or REJECTED".to_owned(),
                ));
            }
        }

        let mut received = Vec::with_capacity(message.credentials.len());
        for container in &message.credentials {
            received.push(self.read_credential(&issuer_did, container).await?);
        }

        for credential in &received {
            self.credentials.save(credential.clone()).await?;
        }

        tracing::info!(
            issuer = %issuer_did,
            holder_pid = %message.holder_pid,
            count = received.len(),
            "credentials stored"
        );
        Ok(received)
    }

    async fn read_credential(
        &self,
        issuer_did: &DidValue,
        container: &CredentialContainer,
    ) -> Result<VerifiableCredential, ServiceError> {
        if container.format != CredentialContainer::JWT_FORMAT {
            return Err(ServiceError::UnsupportedFormat(container.format.to_owned()));
        }

        let profile = ProfileId::detect_from_token(&container.payload)?;
        let formatter = self
            .formatter_provider
            .get_formatter(profile)
            .ok_or_else(|| ServiceError::UnsupportedFormat(profile.to_string()))?;

        let detail = formatter
            .extract_credential(
                &container.payload,
                Box::new(KeyVerification {
                    did_method_provider: self.did_method_provider.clone(),
                    key_algorithm_provider: self.key_algorithm_provider.clone(),
                    key_role: KeyRole::AssertionMethod,
                }),
            )
            .await?;

        if detail.issuer_did.as_ref() != Some(issuer_did) {
            return Err(ServiceError::AuthorizationFailure(format!(
                "credential was not issued by `{issuer_did}`"
            )));
        }
        if detail.subject.as_ref() != Some(&self.identity.did) {
            return Err(ServiceError::ValidationFailure(format!(
                "credential subject is not `{}`",
                self.identity.did
            )));
        }

        let credential_type = detail
            .credential_type()
            .unwrap_or(container.credential_type.as_str())
            .to_owned();
        let id = detail
            .id
            .to_owned()
            .unwrap_or_else(|| format!("urn:uuid:{}", Uuid::new_v4()));

        Ok(VerifiableCredential::builder()
            .id(id.to_owned())
            .holder_did(self.identity.did.clone())
            .issuer_did(issuer_did.clone())
            .credential_type(credential_type)
            .profile_id(detail.profile)
            .issuance_date(detail.valid_from.unwrap_or_else(OffsetDateTime::now_utc))
            .expiration_date(detail.valid_until)
            .credential_status(detail.credential.get("credentialStatus").cloned())
            .credential(detail.credential)
            .credential_ids(vec![id])
            .jwt_representation(container.payload.to_owned())
            .build()?)
    }

    /// Answers a presentation query. Checks run in order and the first failure aborts:
    /// token, rate limit, consent. Revoked credentials are left out of the presentation.
    pub async fn query_presentations(
        &self,
        bearer_token: &str,
        query: PresentationQueryMessage,
    ) -> Result<PresentationResponseMessage, ServiceError> {
        let context = self
            .token_validator
            .validate(bearer_token, self.identity.did.as_str())
            .await?;
        let holder_did = context.subject;

        if !self.rate_limiter.try_consume(&holder_did) {
            return Err(ServiceError::RateLimited(holder_did.to_string()));
        }

        let credential_types = query.credential_types();
        if credential_types.is_empty() {
            return Err(ServiceError::ValidationFailure(
                "the query names no credential types".to_owned(),
            ));
        }

        let now = OffsetDateTime::now_utc();
        if self
            .consent
            .find_valid(&holder_did, &credential_types, now)
            .await?
            .is_none()
        {
            return Err(ServiceError::AuthorizationFailure(format!(
                "no consent covers {credential_types:?}"
            )));
        }

        let mut selected = vec![];
        for credential in self
            .credentials
            .find_by_holder_and_types(&holder_did, &credential_types)
            .await?
        {
            if self.revocation.is_revoked(&credential.credential).await? {
                tracing::info!(credential_id = %credential.id, "leaving out revoked credential");
                continue;
            }
            selected.push(credential);
        }

        if selected.is_empty() {
            return Err(ServiceError::ResourceNotFound(format!(
                "no presentable credentials of {credential_types:?}"
            )));
        }

        let mut presentation = VerifiablePresentation::builder(holder_did.clone())
            .credential_ids(selected.iter().map(|credential| credential.id.to_owned()).collect())
            .credentials(selected.iter().map(embedded_credential).collect())
            .build()?;

        let signed = self
            .signer
            .sign(
                &presentation,
                &self.settings.presentation_format,
                self.identity.auth_fn()?,
            )
            .await?;

        presentation.proof = Some(signed.clone());
        self.presentations.save(presentation.clone()).await?;

        tracing::info!(
            presentation_id = %presentation.id,
            holder = %holder_did,
            credentials = selected.len(),
            "presentation created"
        );
        Ok(PresentationResponseMessage::new(vec![signed]))
    }

    /// A self-issued token for `verifier_did` carrying an access token the verifier can
    /// redeem at this holder's presentation endpoint for `scopes`.
    pub async fn create_verifier_token(
        &self,
        verifier_did: &str,
        scopes: &[String],
    ) -> Result<String, ServiceError> {
        let own_did = self.identity.did.as_str();
        let access_token = create_access_token(
            own_did,
            own_did,
            own_did,
            scopes,
            self.settings.token_validity,
            self.identity.auth_fn()?,
        )
        .await?;

        Ok(create_self_issued_token(
            &self.identity.did,
            verifier_did,
            Some(access_token),
            self.settings.token_validity,
            self.identity.auth_fn()?,
        )
        .await?)
    }

    pub async fn grant_consent(&self, consent: ConsentRecord) -> Result<ConsentRecord, ServiceError> {
        Ok(self.consent.grant(consent).await?)
    }

    pub async fn revoke_consent(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.consent.revoke(id).await?)
    }
}

fn embedded_credential(credential: &VerifiableCredential) -> Value {
    match &credential.jwt_representation {
        Some(token) => Value::String(token.to_owned()),
        None => credential.credential.clone(),
    }
}
