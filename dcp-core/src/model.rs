//! Provider identifiers used to wire the core, and the DCP messages exchanged between
//! issuer and holder.

use dcp_providers::credential_generator::model::{CredentialContainer, CredentialRequestStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyAlgorithmType {
    #[strum(serialize = "ES256")]
    Es256,
}

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, PartialOrd, Ord)]
pub enum StorageType {
    #[strum(serialize = "INTERNAL")]
    Internal,
}

#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, PartialOrd, Ord)]
pub enum DidMethodType {
    #[strum(serialize = "WEB")]
    Web,
}

pub const CREDENTIAL_REQUEST_MESSAGE_TYPE: &str = "CredentialRequestMessage";
pub const CREDENTIAL_MESSAGE_TYPE: &str = "CredentialMessage";

/// A holder asking an issuer for credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequestMessage {
    #[serde(rename = "@context", default)]
    pub context: Vec<String>,
    #[serde(rename = "@type", default = "credential_request_type")]
    pub r#type: String,
    #[serde(default)]
    pub holder_pid: String,
    #[serde(default, alias = "credentials")]
    pub credential_ids: Vec<String>,
}

/// An issuer's decision on a credential request, delivered to the holder's credential service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialMessage {
    #[serde(rename = "@context", default)]
    pub context: Vec<String>,
    #[serde(rename = "@type", default = "credential_message_type")]
    pub r#type: String,
    pub issuer_pid: String,
    pub holder_pid: String,
    pub status: CredentialRequestStatus,
    #[serde(default)]
    pub credentials: Vec<CredentialContainer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl CredentialMessage {
    pub fn new(
        issuer_pid: impl Into<String>,
        holder_pid: impl Into<String>,
        status: CredentialRequestStatus,
        credentials: Vec<CredentialContainer>,
    ) -> Self {
        Self {
            context: vec![dcp_providers::credential_formatter::model::Context::Dcp.to_string()],
            r#type: credential_message_type(),
            issuer_pid: issuer_pid.into(),
            holder_pid: holder_pid.into(),
            status,
            credentials,
            rejection_reason: None,
        }
    }
}

/// Optional body of an approval. Omitted fields fall back to the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    #[serde(default)]
    pub claims: Option<Map<String, Value>>,
    #[serde(default)]
    pub constraints: Vec<Value>,
    /// Credential types to issue instead of the requested ones.
    #[serde(default)]
    pub credentials: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

fn credential_request_type() -> String {
    CREDENTIAL_REQUEST_MESSAGE_TYPE.to_owned()
}

fn credential_message_type() -> String {
    CREDENTIAL_MESSAGE_TYPE.to_owned()
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_credential_request_message_accepts_minimal_body() {
        let message: CredentialRequestMessage = serde_json::from_value(json!({
            "holderPid": "holder-request-1",
            "credentials": ["MembershipCredential"]
        }))
        .unwrap();

        assert_eq!(message.r#type, CREDENTIAL_REQUEST_MESSAGE_TYPE);
        assert_eq!(message.credential_ids, vec!["MembershipCredential"]);
    }

    #[test]
    fn test_credential_message_wire_shape() {
        let message = CredentialMessage::new(
            "issuer-1",
            "holder-1",
            CredentialRequestStatus::Issued,
            vec![CredentialContainer::jwt("MembershipCredential", "a.b.c".to_owned())],
        );

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["@type"], "CredentialMessage");
        assert_eq!(value["status"], "ISSUED");
        assert_eq!(value["issuerPid"], "issuer-1");
        assert_eq!(value["credentials"][0]["credentialType"], "MembershipCredential");
        assert_eq!(value["credentials"][0]["format"], "jwt");
        assert!(value.get("rejectionReason").is_none());
    }
}
