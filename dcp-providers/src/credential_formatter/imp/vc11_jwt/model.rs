use serde::{Deserialize, Serialize};
use serde_with::{formats::PreferOne, serde_as, OneOrMany};
use time::OffsetDateTime;

use crate::credential_formatter::{
    imp::common::Issuer,
    model::{CredentialSchema, CredentialStatus, CredentialSubject},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Vc11Payload {
    pub vc: Vc11Content,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vc11Content {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub r#type: Vec<String>,
    pub credential_subject: CredentialSubject,
    pub issuer: Issuer,
    #[serde(with = "time::serde::rfc3339::option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde_as(as = "OneOrMany<_, PreferOne>")]
    pub credential_status: Vec<CredentialStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_schema: Option<CredentialSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Vc11Proof>,
}

/// Embedded proof metadata. The JWS over the whole token is the actual signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vc11Proof {
    pub r#type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    pub verification_method: String,
    pub proof_purpose: String,
}
