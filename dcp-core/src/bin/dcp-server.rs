//! Serves the issuer, holder and verifier endpoints of one connector.
//!
//! Usage: `dcp-server [config.json]`. Without a file the defaults apply.

use std::sync::Arc;

use dcp_core::{api, config::DcpCoreConfig, DcpCore};
use dcp_providers::http_client::imp::reqwest_client::ReqwestClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading configuration");
            serde_json::from_str::<DcpCoreConfig>(&std::fs::read_to_string(&path)?)?
        }
        None => DcpCoreConfig::default(),
    };
    let bind_address = config.bind_address.0.to_owned();

    let core = DcpCore::new(config, Arc::new(ReqwestClient::default())).map_err(|e| {
        tracing::error!("startup failed: {e}");
        e
    })?;
    let app = api::router(core.app_state());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(did = %core.identity.did, "DCP connector listening on {bind_address}");
    axum::serve(listener, app).await?;

    Ok(())
}
