//! Implementation of did:web.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::{
    common_models::did::DidValue,
    did::{error::DidMethodError, imp::dto::DidDocumentDTO, model::DidDocument, DidMethod},
    http_client::HttpClient,
};

#[cfg(test)]
mod test;

#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Resolve over plain HTTP, for local deployments only.
    pub resolve_to_insecure_http: Option<bool>,
}

pub struct WebDidMethod {
    pub client: Arc<dyn HttpClient>,
    pub params: Params,
}

impl WebDidMethod {
    pub fn new(client: Arc<dyn HttpClient>, params: Params) -> Self {
        Self { client, params }
    }
}

#[async_trait]
impl DidMethod for WebDidMethod {
    async fn resolve(&self, did_value: &DidValue) -> Result<DidDocument, DidMethodError> {
        let url = document_url(did_value, self.params.resolve_to_insecure_http.unwrap_or(false))?;

        let document = self.fetch_document(url).await?;
        if document.id != *did_value {
            return Err(DidMethodError::InvalidDocument(format!(
                "document id `{}` does not match `{did_value}`",
                document.id
            )));
        }

        Ok(document.into())
    }
}

impl WebDidMethod {
    async fn fetch_document(&self, url: Url) -> Result<DidDocumentDTO, DidMethodError> {
        tracing::debug!(%url, "fetching did:web document");

        let fetch_error = |reason: String| DidMethodError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| fetch_error(e.to_string()))?;

        response
            .json()
            .map_err(|e| DidMethodError::InvalidDocument(e.to_string()))
    }
}

/// `did:web:host%3Aport:a:b` maps to `https://host:port/a/b/did.json`, a bare host to
/// `https://host/.well-known/did.json`.
fn document_url(did_value: &DidValue, insecure_http: bool) -> Result<Url, DidMethodError> {
    let invalid = || DidMethodError::InvalidDid(did_value.to_string());

    let mut parts = did_value
        .as_str()
        .strip_prefix("did:web:")
        .ok_or_else(invalid)?
        .split(':');

    let authority = parts
        .next()
        .filter(|authority| !authority.is_empty())
        .ok_or_else(invalid)?
        .replace("%3A", ":");
    let scheme = if insecure_http { "http" } else { "https" };

    let mut url = Url::parse(&format!("{scheme}://{authority}")).map_err(|_| invalid())?;
    let path: Vec<&str> = parts.collect();
    if path.iter().any(|segment| segment.is_empty()) {
        return Err(invalid());
    }

    url.path_segments_mut()
        .map_err(|_| invalid())?
        .extend(if path.is_empty() {
            vec![".well-known"]
        } else {
            path
        })
        .push("did.json");

    Ok(url)
}
