//! Signing and verification seams plus the credential data exchanged with formatters.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;
use time::{Duration, OffsetDateTime};

use super::profile::ProfileId;
use crate::{common_models::did::DidValue, crypto::SignerError};

pub type AuthenticationFn = Box<dyn SignatureProvider>;
pub type VerificationFn = Box<dyn TokenVerifier>;

pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Method for verifying credential.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify<'a>(
        &self,
        issuer_did_value: Option<DidValue>,
        issuer_key_id: Option<&'a str>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError>;
}

/// Method for signing credential with private key without exposing it.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
    fn get_key_id(&self) -> Option<String>;
    fn get_public_key(&self) -> Vec<u8>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Context {
    #[strum(to_string = "https://www.w3.org/2018/credentials/v1")]
    CredentialsV1,
    #[strum(to_string = "https://www.w3.org/ns/credentials/v2")]
    CredentialsV2,
    #[strum(to_string = "https://w3id.org/dspace-dcp/v1.0/dcp.jsonld")]
    Dcp,
}

/// Position of a credential inside a published status list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusListCoordinates {
    pub status_list_credential: String,
    pub index: usize,
}

/// Input for [`CredentialFormatter::generate_jwt`](super::CredentialFormatter::generate_jwt).
#[derive(Debug, Clone)]
pub struct CredentialData {
    pub issuer_did: DidValue,
    pub holder_did: DidValue,
    pub credential_type: String,
    pub claims: serde_json::Map<String, serde_json::Value>,
    pub status: Option<StatusListCoordinates>,
    pub issuance_date: OffsetDateTime,
    pub valid_for: Duration,
    pub schema: Option<CredentialSchema>,
}

#[derive(Debug, Clone)]
pub struct DetailCredential {
    pub id: Option<String>,
    pub profile: ProfileId,
    pub issuer_did: Option<DidValue>,
    pub subject: Option<DidValue>,
    pub types: Vec<String>,
    pub valid_from: Option<OffsetDateTime>,
    pub valid_until: Option<OffsetDateTime>,
    pub claims: CredentialSubject,
    pub status: Vec<CredentialStatus>,
    pub credential_schema: Option<CredentialSchema>,
    /// The credential object itself: the JWT payload for VC 2.0, the `vc` claim for VC 1.1.
    pub credential: serde_json::Value,
}

impl DetailCredential {
    /// First type other than `VerifiableCredential`.
    pub fn credential_type(&self) -> Option<&str> {
        self.types
            .iter()
            .map(String::as_str)
            .find(|t| *t != VERIFIABLE_CREDENTIAL_TYPE)
    }

    pub fn is_expired(&self, now: OffsetDateTime, leeway: u64) -> bool {
        self.valid_until
            .is_some_and(|valid_until| valid_until + Duration::seconds(leeway as i64) < now)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    #[serde(flatten)]
    pub values: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSchema {
    pub id: String,
    pub r#type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_purpose: Option<String>,
    #[serde(flatten)]
    pub additional_fields: HashMap<String, serde_json::Value>,
}

impl CredentialStatus {
    /// Revocation entry pointing at `coordinates`, typed for `profile`.
    pub fn revocation_entry(profile: ProfileId, coordinates: &StatusListCoordinates) -> Self {
        Self {
            id: Some(format!(
                "{}#{}",
                coordinates.status_list_credential, coordinates.index
            )),
            r#type: profile.status_entry_type().to_owned(),
            status_purpose: Some("revocation".to_owned()),
            additional_fields: HashMap::from([
                (
                    "statusListIndex".to_owned(),
                    serde_json::Value::String(coordinates.index.to_string()),
                ),
                (
                    "statusListCredential".to_owned(),
                    serde_json::Value::String(coordinates.status_list_credential.to_owned()),
                ),
            ]),
        }
    }
}
