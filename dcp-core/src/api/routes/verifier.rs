use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use dcp_providers::common_models::did::DidValue;
use serde::{Deserialize, Serialize};

use crate::{
    api::{error::extract_json, extractors::AdminCaller, AppState},
    service::{error::ServiceError, verifier_service::VerificationOutcome},
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Self-issued token the holder handed to this verifier.
    pub token: String,
    #[serde(default)]
    pub required_types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustIssuerRequest {
    pub credential_type: String,
    pub issuer: DidValue,
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/verifier/verify", post(verify))
        .route("/verifier/trusted-issuers", post(trust_issuer))
}

async fn verify(
    _: AdminCaller,
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerificationOutcome>, ServiceError> {
    let request = extract_json(body)?;
    let outcome = state
        .verifier
        .verify(&request.token, &request.required_types)
        .await?;

    Ok(Json(outcome))
}

async fn trust_issuer(
    _: AdminCaller,
    State(state): State<AppState>,
    body: Result<Json<TrustIssuerRequest>, JsonRejection>,
) -> Result<StatusCode, ServiceError> {
    let request = extract_json(body)?;
    if request.credential_type.trim().is_empty() {
        return Err(ServiceError::ValidationFailure(
            "`credentialType` must not be blank".to_owned(),
        ));
    }

    state
        .issuer_trust
        .add_trust(&request.credential_type, request.issuer);
    Ok(StatusCode::NO_CONTENT)
}
