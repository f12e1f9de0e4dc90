//! Issuer service: credential requests from holders and the operator's decisions on them.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dcp_providers::credential_generator::model::CredentialRequest;

use crate::{
    api::{error::extract_json, extractors::BearerToken, AppState},
    model::{ApproveRequest, CredentialRequestMessage, RejectRequest},
    service::error::ServiceError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/issuer/credentials", post(create_request))
        .route("/issuer/requests/:id", get(get_request))
        .route("/issuer/requests/:id/approve", post(approve_request))
        .route("/issuer/requests/:id/reject", post(reject_request))
}

async fn create_request(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    body: Result<Json<CredentialRequestMessage>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let message = extract_json(body)?;
    let request = state.issuer.create_request(&token, message).await?;

    let location = format!("/issuer/requests/{}", request.issuer_pid());
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(request)).into_response())
}

async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CredentialRequest>, ServiceError> {
    Ok(Json(state.issuer.get_request(&id).await?))
}

async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ApproveRequest>>,
) -> Result<Json<CredentialRequest>, ServiceError> {
    let approval = body.map(|Json(approval)| approval).unwrap_or_default();
    Ok(Json(state.issuer.approve(&id, approval).await?))
}

async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RejectRequest>>,
) -> Result<Json<CredentialRequest>, ServiceError> {
    let reason = body.and_then(|Json(rejection)| rejection.rejection_reason);
    Ok(Json(state.issuer.reject(&id, reason).await?))
}
