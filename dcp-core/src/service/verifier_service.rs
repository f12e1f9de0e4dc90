//! Verifier side of the presentation flow.
//!
//! 1. validate the caller's self-issued token,
//! 2. read the access token it carries,
//! 3. find the holder's credential service,
//! 4. query it for presentations.

use std::sync::Arc;

use dcp_providers::{
    common_models::did::DidValue,
    http_client::HttpClient,
    presentation::{
        model::{PresentationQueryMessage, PresentationResponseMessage},
        validation::{PresentationValidationService, ValidationReport},
    },
    token::{imp::access_token::parse_access_token, model::TokenContext, TokenValidator},
};
use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;

use super::{did_service::DidService, identity::ParticipantIdentity};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VerifierStep {
    #[strum(serialize = "token validation")]
    TokenValidation,
    #[strum(serialize = "access token parsing")]
    AccessTokenParsing,
    #[strum(serialize = "DID resolution")]
    DidResolution,
    #[strum(serialize = "presentation query")]
    PresentationQuery,
}

#[derive(Debug, Error)]
#[error("Verifier {step} failed: {reason}")]
pub struct VerifierError {
    pub step: VerifierStep,
    pub reason: String,
}

impl VerifierError {
    fn at(step: VerifierStep) -> impl FnOnce(String) -> Self {
        move |reason| Self { step, reason }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFlowResult {
    pub access_token: String,
    pub holder_did: DidValue,
    pub credential_service_url: String,
    pub scopes: Vec<String>,
    pub presentation_response: PresentationResponseMessage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub holder_did: DidValue,
    pub scopes: Vec<String>,
    pub report: ValidationReport,
}

pub struct VerifierService {
    identity: Arc<ParticipantIdentity>,
    token_validator: Arc<dyn TokenValidator>,
    did_service: Arc<DidService>,
    client: Arc<dyn HttpClient>,
    validation: Arc<PresentationValidationService>,
}

impl VerifierService {
    pub fn new(
        identity: Arc<ParticipantIdentity>,
        token_validator: Arc<dyn TokenValidator>,
        did_service: Arc<DidService>,
        client: Arc<dyn HttpClient>,
        validation: Arc<PresentationValidationService>,
    ) -> Self {
        Self {
            identity,
            token_validator,
            did_service,
            client,
            validation,
        }
    }

    /// Runs the four steps and returns what the holder presented, unvalidated.
    pub async fn execute_flow(
        &self,
        self_issued_token: &str,
    ) -> Result<VerificationFlowResult, VerifierError> {
        tracing::info!(step = %VerifierStep::TokenValidation, "verifier flow started");
        let context = self
            .token_validator
            .validate(self_issued_token, self.identity.did.as_str())
            .await
            .map_err(|e| VerifierError::at(VerifierStep::TokenValidation)(e.to_string()))?;
        let access_token = context.access_token.ok_or_else(|| {
            VerifierError::at(VerifierStep::TokenValidation)("missing `token` claim".to_owned())
        })?;

        tracing::info!(step = %VerifierStep::AccessTokenParsing, caller = %context.subject);
        let parsed = parse_access_token(&access_token)
            .map_err(|e| VerifierError::at(VerifierStep::AccessTokenParsing)(e.to_string()))?;
        let holder_did = DidValue::from(parsed.issuer);

        tracing::info!(step = %VerifierStep::DidResolution, holder = %holder_did);
        let credential_service_url = self
            .did_service
            .credential_service_url(&holder_did)
            .await
            .map_err(|e| VerifierError::at(VerifierStep::DidResolution)(e.to_string()))?;

        tracing::info!(
            step = %VerifierStep::PresentationQuery,
            endpoint = %credential_service_url,
            scopes = ?parsed.scopes
        );
        let presentation_response = self
            .query_presentations(&credential_service_url, &access_token, &parsed.scopes)
            .await
            .map_err(VerifierError::at(VerifierStep::PresentationQuery))?;

        tracing::info!(
            holder = %holder_did,
            presentations = presentation_response.presentation.len(),
            "verifier flow completed"
        );
        Ok(VerificationFlowResult {
            access_token,
            holder_did,
            credential_service_url,
            scopes: parsed.scopes,
            presentation_response,
        })
    }

    /// Runs the flow and validates the presentations against `required_types`.
    pub async fn verify(
        &self,
        self_issued_token: &str,
        required_types: &[String],
    ) -> Result<VerificationOutcome, VerifierError> {
        let result = self.execute_flow(self_issued_token).await?;

        let context = TokenContext {
            subject: result.holder_did.clone(),
            issuer: result.holder_did.clone(),
            audience: vec![self.identity.did.to_string()],
            scopes: result.scopes.clone(),
            access_token: Some(result.access_token.clone()),
            expires_at: None,
        };
        let report = self
            .validation
            .validate(&result.presentation_response, required_types, &context)
            .await;

        tracing::info!(
            holder = %result.holder_did,
            valid = report.is_valid(),
            accepted = ?report.accepted_credential_types,
            "presentations validated"
        );
        Ok(VerificationOutcome {
            holder_did: result.holder_did,
            scopes: result.scopes,
            report,
        })
    }

    async fn query_presentations(
        &self,
        credential_service_url: &str,
        access_token: &str,
        scopes: &[String],
    ) -> Result<PresentationResponseMessage, String> {
        let url = format!(
            "{}/presentations/query",
            credential_service_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(PresentationQueryMessage::new(scopes.to_vec()))
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| format!("request to `{url}` failed: {e}"))?
            .error_for_status()
            .map_err(|e| format!("holder refused the query: {e}"))?;

        if response.is_empty() {
            return Err("holder rejected the query with an empty response".to_owned());
        }

        response
            .json()
            .map_err(|e| format!("unreadable presentation response: {e}"))
    }
}
