use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::Display;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    common_models::{did::DidValue, ValidationError},
    credential_formatter::model::StatusListCoordinates,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialRequestStatus {
    Pending,
    Issued,
    Rejected,
}

/// A holder's request for credentials, decided exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    issuer_pid: String,
    holder_pid: String,
    holder_did: DidValue,
    credential_ids: Vec<String>,
    status: CredentialRequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl CredentialRequest {
    pub fn new(
        holder_pid: impl Into<String>,
        holder_did: DidValue,
        credential_ids: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let holder_pid = holder_pid.into();
        if holder_pid.trim().is_empty() {
            return Err(ValidationError("`holderPid` must not be blank".to_owned()));
        }
        if credential_ids.is_empty() {
            return Err(ValidationError(
                "at least one credential must be requested".to_owned(),
            ));
        }

        Ok(Self {
            issuer_pid: Uuid::new_v4().to_string(),
            holder_pid,
            holder_did,
            credential_ids,
            status: CredentialRequestStatus::Pending,
            rejection_reason: None,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    pub fn issuer_pid(&self) -> &str {
        &self.issuer_pid
    }

    pub fn holder_pid(&self) -> &str {
        &self.holder_pid
    }

    pub fn holder_did(&self) -> &DidValue {
        &self.holder_did
    }

    pub fn credential_ids(&self) -> &[String] {
        &self.credential_ids
    }

    pub fn status(&self) -> CredentialRequestStatus {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn issue(&mut self) -> Result<(), ValidationError> {
        self.ensure_pending()?;
        self.status = CredentialRequestStatus::Issued;
        Ok(())
    }

    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), ValidationError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ValidationError("`rejectionReason` must not be blank".to_owned()));
        }

        self.ensure_pending()?;
        self.status = CredentialRequestStatus::Rejected;
        self.rejection_reason = Some(reason);
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), ValidationError> {
        match self.status {
            CredentialRequestStatus::Pending => Ok(()),
            status => Err(ValidationError(format!(
                "request `{}` is already {status}",
                self.issuer_pid
            ))),
        }
    }
}

/// Everything a generator needs to produce one credential.
#[derive(Debug, Clone)]
pub struct CredentialGenerationContext {
    pub request: CredentialRequest,
    /// May carry the reserved `__credentialMetadata` map selecting profiles.
    pub requested_claims: Option<Map<String, Value>>,
    pub constraints: Vec<Value>,
    /// Status list slot reserved for this credential, if the issuer publishes one.
    pub status: Option<StatusListCoordinates>,
}

/// A generated credential ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialContainer {
    pub credential_type: String,
    pub format: String,
    pub payload: String,
}

impl CredentialContainer {
    pub const JWT_FORMAT: &'static str = "jwt";

    pub fn jwt(credential_type: impl Into<String>, payload: String) -> Self {
        Self {
            credential_type: credential_type.into(),
            format: Self::JWT_FORMAT.to_owned(),
            payload,
        }
    }
}
