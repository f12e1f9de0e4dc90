//! Holder credential service: presentation queries and credential delivery from issuers,
//! plus consent management and minting tokens for verifiers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use dcp_providers::{
    presentation::model::{PresentationQueryMessage, PresentationResponseMessage},
    trust::model::ConsentRecord,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    api::{
        error::extract_json,
        extractors::{AdminCaller, BearerToken},
        AppState,
    },
    model::CredentialMessage,
    service::error::ServiceError,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedCredentials {
    pub credential_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantConsentRequest {
    pub requested: Vec<String>,
    /// Defaults to everything requested.
    #[serde(default)]
    pub granted: Option<Vec<String>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierTokenRequest {
    pub verifier_did: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifierTokenResponse {
    pub token: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dcp/presentations/query", post(query_presentations))
        .route("/dcp/credentials", post(receive_credentials))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/holder/consents", post(grant_consent))
        .route("/holder/consents/:id", delete(revoke_consent))
        .route("/holder/tokens", post(create_verifier_token))
}

async fn query_presentations(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    body: Result<Json<PresentationQueryMessage>, JsonRejection>,
) -> Result<Json<PresentationResponseMessage>, ServiceError> {
    let query = extract_json(body)?;
    Ok(Json(state.holder.query_presentations(&token, query).await?))
}

async fn receive_credentials(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    body: Result<Json<CredentialMessage>, JsonRejection>,
) -> Result<Json<ReceivedCredentials>, ServiceError> {
    let message = extract_json(body)?;
    let received = state.holder.receive_credentials(&token, message).await?;

    Ok(Json(ReceivedCredentials {
        credential_ids: received.into_iter().map(|credential| credential.id).collect(),
    }))
}

async fn grant_consent(
    _: AdminCaller,
    State(state): State<AppState>,
    body: Result<Json<GrantConsentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ConsentRecord>), ServiceError> {
    let request = extract_json(body)?;

    let mut builder = ConsentRecord::builder(state.holder.did().clone())
        .granted(request.granted.unwrap_or_else(|| request.requested.clone()))
        .requested(request.requested);
    if let Some(expires_at) = request.expires_at {
        builder = builder.expires_at(expires_at);
    }

    let consent = state.holder.grant_consent(builder.build()?).await?;
    Ok((StatusCode::CREATED, Json(consent)))
}

async fn revoke_consent(
    _: AdminCaller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    state.holder.revoke_consent(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_verifier_token(
    _: AdminCaller,
    State(state): State<AppState>,
    body: Result<Json<VerifierTokenRequest>, JsonRejection>,
) -> Result<Json<VerifierTokenResponse>, ServiceError> {
    let request = extract_json(body)?;
    let token = state
        .holder
        .create_verifier_token(&request.verifier_did, &request.scopes)
        .await?;

    Ok(Json(VerifierTokenResponse { token }))
}
