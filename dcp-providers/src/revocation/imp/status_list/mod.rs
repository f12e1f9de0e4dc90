//! StatusList2021 / Bitstring Status List revocation checks.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

use self::{
    cache::{StatusListCache, DEFAULT_MAX_ENTRIES},
    model::{CachedStatusList, StatusEntry},
    util::decode_bitstring,
};
use crate::{
    credential_formatter::imp::jwt::Jwt,
    http_client::HttpClient,
    revocation::{error::RevocationError, RevocationService},
};

pub mod cache;
pub mod model;
pub mod util;


pub struct StatusListRevocationService {
    client: Arc<dyn HttpClient>,
    cache: StatusListCache,
}

impl StatusListRevocationService {
    pub fn new(client: Arc<dyn HttpClient>, ttl: Duration) -> Self {
        Self {
            client,
            cache: StatusListCache::new(ttl, DEFAULT_MAX_ENTRIES),
        }
    }

    async fn status_list(&self, url: &str) -> Result<Arc<CachedStatusList>, RevocationError> {
        let now = OffsetDateTime::now_utc();
        if let Some(cached) = self.cache.get_fresh(url, now).await {
            tracing::debug!(url, "status list cache hit");
            return Ok(cached);
        }

        tracing::debug!(url, "fetching status list");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RevocationError::fetch(url, e))?
            .error_for_status()
            .map_err(|e| RevocationError::fetch(url, e))?;

        let credential = parse_status_list_credential(url, &response.body)?;
        let encoded_list = encoded_list(&credential)
            .ok_or_else(|| RevocationError::format(url, "missing encodedList"))?;
        let bits = decode_bitstring(encoded_list).map_err(|e| RevocationError::format(url, e))?;

        Ok(self
            .cache
            .insert(
                url,
                CachedStatusList {
                    credential,
                    bits,
                    fetched_at: now,
                },
            )
            .await)
    }
}

#[async_trait]
impl RevocationService for StatusListRevocationService {
    async fn is_revoked(&self, credential: &Value) -> Result<bool, RevocationError> {
        let Some(status) = credential.get("credentialStatus") else {
            return Ok(false);
        };

        let Some(entry) = status_entry(status) else {
            tracing::warn!("credentialStatus without statusListCredential, treating as not revoked");
            return Ok(false);
        };

        let Some(index) = entry.index else {
            tracing::warn!(
                url = %entry.status_list_credential,
                "malformed statusListIndex, treating as not revoked"
            );
            return Ok(false);
        };

        let list = self.status_list(&entry.status_list_credential).await?;
        Ok(list.is_set(index))
    }
}

/// First entry carrying a `statusListCredential`, from an object or a list.
fn status_entry(status: &Value) -> Option<StatusEntry> {
    let parse = |entry: &Value| -> Option<StatusEntry> {
        let status_list_credential = entry.get("statusListCredential")?.as_str()?.to_owned();
        Some(StatusEntry {
            status_list_credential,
            index: entry.get("statusListIndex").and_then(parse_index),
        })
    };

    match status {
        Value::Array(entries) => entries.iter().find_map(parse),
        entry => parse(entry),
    }
}

fn parse_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(string) => string.trim().parse().ok(),
        _ => None,
    }
}

/// The list may be published as plain JSON or as a compact JWT carrying the credential.
fn parse_status_list_credential(url: &str, body: &[u8]) -> Result<Value, RevocationError> {
    let text = std::str::from_utf8(body).map_err(|e| RevocationError::format(url, e))?;
    let text = text.trim();

    if text.starts_with('{') {
        return serde_json::from_str(text).map_err(|e| RevocationError::format(url, e));
    }

    let decomposed = Jwt::<Map<String, Value>>::decompose_token(text)
        .map_err(|e| RevocationError::format(url, e))?;
    serde_json::from_str(&decomposed.payload_json).map_err(|e| RevocationError::format(url, e))
}

fn encoded_list(credential: &Value) -> Option<&str> {
    credential
        .pointer("/credentialSubject/encodedList")
        .or_else(|| credential.pointer("/vc/credentialSubject/encodedList"))
        .and_then(Value::as_str)
}
