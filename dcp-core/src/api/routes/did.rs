use axum::{extract::State, routing::get, Json, Router};
use dcp_providers::did::imp::dto::DidDocumentDTO;

use crate::{api::AppState, service::error::ServiceError};

pub fn router() -> Router<AppState> {
    Router::new().route("/.well-known/did.json", get(did_document))
}

async fn did_document(State(state): State<AppState>) -> Result<Json<DidDocumentDTO>, ServiceError> {
    Ok(Json(state.did.own_did_document()?))
}
