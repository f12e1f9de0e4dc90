//! HTTP boundary of the connector.
//!
//! | Prefix                         | Module                 |
//! |--------------------------------|------------------------|
//! | `/dcp/*`, `/holder/*`          | [`routes::holder`]     |
//! | `/issuer/*`                    | [`routes::issuer`]     |
//! | `/verifier/*`                  | [`routes::verifier`]   |
//! | `/.well-known/did.json`        | [`routes::did`]        |
//!
//! `/holder/*` and `/verifier/*` administer this connector and are only served when an
//! admin token is configured; callers present it as a bearer token.

use std::sync::Arc;

use axum::Router;
use dcp_providers::trust::issuer_trust::IssuerTrustService;
use tower_http::trace::TraceLayer;

use crate::{
    config::AdminToken,
    service::{
        did_service::DidService, holder_service::HolderService, issuer_service::IssuerService,
        verifier_service::VerifierService,
    },
};

pub mod error;
pub mod extractors;
pub mod routes;


#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<IssuerService>,
    pub holder: Arc<HolderService>,
    pub verifier: Arc<VerifierService>,
    pub did: Arc<DidService>,
    pub issuer_trust: Arc<IssuerTrustService>,
    pub admin_token: Option<AdminToken>,
}

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(routes::holder::router())
        .merge(routes::issuer::router())
        .merge(routes::did::router());

    if state.admin_token.is_some() {
        router = router
            .merge(routes::holder::admin_router())
            .merge(routes::verifier::admin_router());
    } else {
        tracing::info!("no admin token configured, administration endpoints disabled");
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
