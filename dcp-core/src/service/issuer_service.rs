//! Issuer side of the DCP credential issuance protocol.
//!
//! A holder files a request with a self-issued token. An operator approves or rejects it;
//! the outcome is pushed to the `CredentialService` the holder publishes in its DID document.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use dcp_providers::{
    common_models::did::DidValue,
    credential_formatter::model::StatusListCoordinates,
    credential_generator::{
        model::{CredentialGenerationContext, CredentialRequest, CredentialRequestStatus},
        provider::CredentialGeneratorProvider,
    },
    http_client::HttpClient,
    storage::CredentialRequestStorage,
    token::{imp::self_issued::create_self_issued_token, TokenValidator},
};
use time::Duration;

use super::{did_service::DidService, error::ServiceError, identity::ParticipantIdentity};
use crate::model::{ApproveRequest, CredentialMessage, CredentialRequestMessage};


/// Hands out consecutive slots of the issuer's status list.
#[derive(Debug)]
pub struct StatusListAllocator {
    status_list_credential: String,
    next_index: AtomicUsize,
}

impl StatusListAllocator {
    pub fn new(status_list_credential: impl Into<String>) -> Self {
        Self {
            status_list_credential: status_list_credential.into(),
            next_index: AtomicUsize::new(0),
        }
    }

    pub fn allocate(&self) -> StatusListCoordinates {
        StatusListCoordinates {
            status_list_credential: self.status_list_credential.to_owned(),
            index: self.next_index.fetch_add(1, Ordering::Relaxed),
        }
    }
}

pub struct IssuerService {
    identity: Arc<ParticipantIdentity>,
    token_validator: Arc<dyn TokenValidator>,
    requests: Arc<dyn CredentialRequestStorage>,
    generators: Arc<dyn CredentialGeneratorProvider>,
    did_service: Arc<DidService>,
    client: Arc<dyn HttpClient>,
    status_list: Option<StatusListAllocator>,
    token_validity: Duration,
}

impl IssuerService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Arc<ParticipantIdentity>,
        token_validator: Arc<dyn TokenValidator>,
        requests: Arc<dyn CredentialRequestStorage>,
        generators: Arc<dyn CredentialGeneratorProvider>,
        did_service: Arc<DidService>,
        client: Arc<dyn HttpClient>,
        status_list: Option<StatusListAllocator>,
        token_validity: Duration,
    ) -> Self {
        Self {
            identity,
            token_validator,
            requests,
            generators,
            did_service,
            client,
            status_list,
            token_validity,
        }
    }

    /// Records a request from the holder authenticated by `bearer_token`.
    pub async fn create_request(
        &self,
        bearer_token: &str,
        message: CredentialRequestMessage,
    ) -> Result<CredentialRequest, ServiceError> {
        let context = self
            .token_validator
            .validate(bearer_token, self.identity.did.as_str())
            .await?;

        let request =
            CredentialRequest::new(message.holder_pid, context.subject, message.credential_ids)?;
        self.requests.save(request.clone()).await?;

        tracing::info!(
            issuer_pid = request.issuer_pid(),
            holder_did = %request.holder_did(),
            credentials = ?request.credential_ids(),
            "credential request received"
        );
        Ok(request)
    }

    pub async fn get_request(&self, issuer_pid: &str) -> Result<CredentialRequest, ServiceError> {
        self.requests.get(issuer_pid).await?.ok_or_else(|| {
            ServiceError::ResourceNotFound(format!("credential request `{issuer_pid}`"))
        })
    }

    /// Generates the credentials, delivers them to the holder and marks the request issued.
    /// The request is claimed as issued before delivery; a failure puts it back to pending.
    pub async fn approve(
        &self,
        issuer_pid: &str,
        approval: ApproveRequest,
    ) -> Result<CredentialRequest, ServiceError> {
        let pending = self.get_request(issuer_pid).await?;
        let mut issued = pending.clone();
        issued.issue()?;
        self.claim(issued.clone()).await?;

        if let Err(error) = self.issue_credentials(&issued, approval).await {
            if !self
                .requests
                .replace_if(pending, CredentialRequestStatus::Issued)
                .await?
            {
                tracing::error!(issuer_pid, "issued request changed during delivery");
            }
            return Err(error);
        }

        Ok(issued)
    }

    async fn issue_credentials(
        &self,
        request: &CredentialRequest,
        approval: ApproveRequest,
    ) -> Result<(), ServiceError> {
        let issuer_pid = request.issuer_pid();
        let credential_types = approval
            .credentials
            .filter(|credentials| !credentials.is_empty())
            .unwrap_or_else(|| request.credential_ids().to_vec());

        let mut credentials = Vec::with_capacity(credential_types.len());
        for credential_type in &credential_types {
            let context = CredentialGenerationContext {
                request: request.clone(),
                requested_claims: approval.claims.clone(),
                constraints: approval.constraints.clone(),
                status: self.status_list.as_ref().map(StatusListAllocator::allocate),
            };

            let container = self
                .generators
                .get_generator(credential_type)
                .generate_credential(&context)
                .await?;
            tracing::debug!(issuer_pid, credential_type = %credential_type, "credential generated");
            credentials.push(container);
        }

        let message = CredentialMessage::new(
            issuer_pid,
            request.holder_pid(),
            CredentialRequestStatus::Issued,
            credentials,
        );
        self.deliver(request.holder_did(), &message).await?;

        tracing::info!(
            issuer_pid,
            holder_did = %request.holder_did(),
            count = message.credentials.len(),
            "credentials issued"
        );
        Ok(())
    }

    /// Rejects the request and notifies the holder. Notification failures are logged only.
    pub async fn reject(
        &self,
        issuer_pid: &str,
        rejection_reason: Option<String>,
    ) -> Result<CredentialRequest, ServiceError> {
        let reason = rejection_reason
            .filter(|reason| !reason.trim().is_empty())
            .ok_or_else(|| {
                ServiceError::ValidationFailure("`rejectionReason` is required".to_owned())
            })?;

        let mut request = self.get_request(issuer_pid).await?;
        request.reject(reason.to_owned())?;
        self.claim(request.clone()).await?;
        tracing::info!(issuer_pid, reason = %reason, "credential request rejected");

        let mut message = CredentialMessage::new(
            request.issuer_pid(),
            request.holder_pid(),
            CredentialRequestStatus::Rejected,
            vec![],
        );
        message.rejection_reason = Some(reason);
        if let Err(error) = self.deliver(request.holder_did(), &message).await {
            tracing::warn!(issuer_pid, %error, "could not notify holder of rejection");
        }

        Ok(request)
    }

    /// Stores the outcome if the request is still pending in storage.
    async fn claim(&self, request: CredentialRequest) -> Result<(), ServiceError> {
        let issuer_pid = request.issuer_pid().to_owned();
        if self
            .requests
            .replace_if(request, CredentialRequestStatus::Pending)
            .await?
        {
            return Ok(());
        }

        let current = self.get_request(&issuer_pid).await?;
        Err(ServiceError::ValidationFailure(format!(
            "request `{issuer_pid}` is already {}",
            current.status()
        )))
    }

    async fn deliver(
        &self,
        holder_did: &DidValue,
        message: &CredentialMessage,
    ) -> Result<(), ServiceError> {
        let endpoint = self.did_service.credential_service_url(holder_did).await?;
        let url = format!("{}/credentials", endpoint.trim_end_matches('/'));

        let token = create_self_issued_token(
            &self.identity.did,
            holder_did.as_str(),
            None,
            self.token_validity,
            self.identity.auth_fn()?,
        )
        .await?;

        self.client
            .post(&url)
            .bearer_auth(&token)
            .json(message)?
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(%url, status = %message.status, "credential message delivered");
        Ok(())
    }
}
