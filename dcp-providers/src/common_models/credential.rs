//! Credentials as held by a holder.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::{did::DidValue, ValidationError};
use crate::credential_formatter::profile::ProfileId;

/// A received credential. Built once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    pub id: String,
    pub holder_did: DidValue,
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,
    #[serde(with = "time::serde::rfc3339")]
    pub issuance_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Decoded credential JSON: the token payload for VC 2.0, the `vc` object for VC 1.1.
    pub credential: Value,
    #[serde(default)]
    pub credential_ids: Vec<String>,
    pub issuer_did: DidValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<Value>,
    /// The token as received, embedded as-is in presentations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_representation: Option<String>,
}

impl VerifiableCredential {
    pub fn builder() -> VerifiableCredentialBuilder {
        VerifiableCredentialBuilder::default()
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expiration_date.is_some_and(|expiration| expiration < now)
    }
}

#[derive(Debug, Default)]
pub struct VerifiableCredentialBuilder {
    id: Option<String>,
    holder_did: Option<DidValue>,
    credential_type: Option<String>,
    profile_id: Option<ProfileId>,
    issuance_date: Option<OffsetDateTime>,
    expiration_date: Option<OffsetDateTime>,
    credential: Option<Value>,
    credential_ids: Vec<String>,
    issuer_did: Option<DidValue>,
    credential_status: Option<Value>,
    jwt_representation: Option<String>,
}

impl VerifiableCredentialBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn holder_did(mut self, holder_did: DidValue) -> Self {
        self.holder_did = Some(holder_did);
        self
    }

    pub fn credential_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = Some(credential_type.into());
        self
    }

    pub fn profile_id(mut self, profile_id: ProfileId) -> Self {
        self.profile_id = Some(profile_id);
        self
    }

    pub fn issuance_date(mut self, issuance_date: OffsetDateTime) -> Self {
        self.issuance_date = Some(issuance_date);
        self
    }

    pub fn expiration_date(mut self, expiration_date: Option<OffsetDateTime>) -> Self {
        self.expiration_date = expiration_date;
        self
    }

    pub fn credential(mut self, credential: Value) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn credential_ids(mut self, credential_ids: Vec<String>) -> Self {
        self.credential_ids = credential_ids;
        self
    }

    pub fn issuer_did(mut self, issuer_did: DidValue) -> Self {
        self.issuer_did = Some(issuer_did);
        self
    }

    pub fn credential_status(mut self, credential_status: Option<Value>) -> Self {
        self.credential_status = credential_status;
        self
    }

    pub fn jwt_representation(mut self, jwt_representation: impl Into<String>) -> Self {
        self.jwt_representation = Some(jwt_representation.into());
        self
    }

    pub fn build(self) -> Result<VerifiableCredential, ValidationError> {
        fn required<T>(value: Option<T>, name: &str) -> Result<T, ValidationError> {
            value.ok_or_else(|| ValidationError(format!("`{name}` is required")))
        }

        let credential_type = required(self.credential_type, "credentialType")?;
        if credential_type.trim().is_empty() {
            return Err(ValidationError("`credentialType` must not be blank".to_owned()));
        }

        Ok(VerifiableCredential {
            id: required(self.id, "id")?,
            holder_did: required(self.holder_did, "holderDid")?,
            credential_type,
            profile_id: self.profile_id,
            issuance_date: required(self.issuance_date, "issuanceDate")?,
            expiration_date: self.expiration_date,
            credential: required(self.credential, "credential")?,
            credential_ids: self.credential_ids,
            issuer_did: required(self.issuer_did, "issuerDid")?,
            credential_status: self.credential_status,
            jwt_representation: self.jwt_representation,
        })
    }
}
